//! 事件子系统（eventing）
//!
//! 进程内的类型化事件分发：
//! - `EventBus`：显式构造、显式持有的路由表，事件具体类型 → 按注册顺序排列的订阅列表；
//! - `EventHandler`：处理某一具体事件类型；
//! - `EventSubscriber` / `HandlerRegistration`：组件以静态列表声明自己的处理器，
//!   由装配代码统一订阅（配合 `#[event_subscriber]` 宏在编译期生成）；
//! - `PublishHandle` / `PublishReport`：发布是即发即弃的扇出，句柄仅用于测试或等待完成。
//!
//! 处理器之间相互隔离：任一处理器返回错误或 panic，只记录日志，
//! 不会中断其余处理器，也不会回传给发布方。
//!
mod bus;
mod handler;
mod publish;
mod registration;
mod subscription;

pub use bus::EventBus;
pub use handler::EventHandler;
pub use publish::{HandlerFailure, PublishHandle, PublishReport};
pub use registration::{EventSubscriber, HandlerRegistration};
pub use subscription::{SubscriberId, Subscription};
