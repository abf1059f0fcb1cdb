//! 学校身份平台领域层（schulportal-domain）
//!
//! 提供 Personenkontext 管理的领域核心：
//! - 领域模型（`model`）：人员、组织单元、角色与 Personenkontext；
//! - 只读仓储端口（`repository`）及用于测试/演示的内存实现；
//! - 可组合的异步规约（`specification`）与按序短路的规约聚合器；
//! - 领域规约（`rules`）：角色与组织类型相容、班级角色镜像学校、角色类别一致等；
//! - 领域事件（`event`）与进程内类型化事件总线（`eventing`）。
//!
//! 规约只回答“是否满足”，查找失败一律以错误向上传播（失败即拒绝），
//! 从不被当作“满足”。事件总线的发布是即发即弃的扇出，处理器失败与发布方隔离。
//!
pub mod error;
pub mod event;
#[cfg(feature = "eventing")]
pub mod eventing;
pub mod model;
pub mod repository;
pub mod rules;
pub mod specification;

// 过程宏生成的代码使用 ::schulportal_domain 路径，
// 自引用使其在本 crate 内部（含单元测试）同样可解析。
extern crate self as schulportal_domain;
