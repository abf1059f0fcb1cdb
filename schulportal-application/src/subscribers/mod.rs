//! 事件消费者
//!
//! 每个消费者是一个普通组件：构造时注入各自的出站端口，
//! 通过 `#[event_subscriber]` 声明处理器，由装配代码统一订阅。
//! 外部系统（目录服务、邮件、群件、学习平台）只以端口 trait 出现，
//! 协议适配由基础设施层提供。
//!
mod audit_log;
mod directory_sync;
mod groupware_lifecycle;
mod learning_platform_sync;
mod mail_lifecycle;

pub use audit_log::{AuditEntry, AuditLog, AuditSink, TracingAuditSink};
pub use directory_sync::{DirectoryPort, DirectorySync};
pub use groupware_lifecycle::{GroupwareLifecycle, GroupwarePort};
pub use learning_platform_sync::{LearningPlatformPort, LearningPlatformSync};
pub use mail_lifecycle::{MailLifecycle, MailPort};
