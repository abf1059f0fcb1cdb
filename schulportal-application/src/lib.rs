//! 学校身份平台应用层（schulportal-application）
//!
//! - `rules`：Personenkontext 用例的规约聚合器与违规标签；
//! - `service`：评估规则、持久化并发布事件的用例服务；
//! - `subscribers`：目录同步、邮箱生命周期、群件生命周期、学习平台同步与审计日志五个事件消费者；
//! - `config` / `telemetry`：环境变量配置与 tracing 初始化；
//! - `wiring`：显式装配事件总线、服务与消费者，以及关闭时的批量退订。
//!
pub mod config;
pub mod error;
pub mod rules;
pub mod service;
pub mod subscribers;
pub mod telemetry;
pub mod wiring;

pub use config::{AppConfig, LogFormat};
pub use error::{AppError, AppResult};
pub use rules::{PersonenkontextRules, RuleViolation};
pub use service::PersonenkontextService;
pub use wiring::{Adapters, Application};
