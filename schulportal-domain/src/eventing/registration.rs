//! 处理器注册（HandlerRegistration / EventSubscriber）
//!
//! 组件在装配阶段以静态列表声明 (事件类型, 方法) 对，装配代码逐条调用订阅，
//! 处理器绑定到组件实例本身（`Arc<Self>`），执行时可访问组件状态。
//! 未被构造的组件不会产生任何注册。
//!
use super::handler::{ErasedHandler, erase};
use super::subscription::SubscriberId;
use crate::event::DomainEvent;
use std::any::TypeId;
use std::future::Future;
use std::sync::Arc;

/// 一条待订阅的处理器声明
pub struct HandlerRegistration {
    pub(crate) event_type: TypeId,
    pub(crate) event_name: &'static str,
    pub(crate) subscriber_id: SubscriberId,
    pub(crate) handler: ErasedHandler,
}

impl HandlerRegistration {
    /// 把组件方法绑定为事件 `E` 的处理器
    pub fn new<E, C, F, Fut>(
        component: Arc<C>,
        subscriber_id: impl Into<SubscriberId>,
        method: F,
    ) -> Self
    where
        E: DomainEvent,
        C: Send + Sync + 'static,
        F: Fn(Arc<C>, Arc<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            event_type: TypeId::of::<E>(),
            event_name: E::NAME,
            subscriber_id: subscriber_id.into(),
            handler: erase::<E, _, _>(move |event| method(Arc::clone(&component), event)),
        }
    }

    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    pub fn subscriber_id(&self) -> &SubscriberId {
        &self.subscriber_id
    }
}

/// 事件订阅者：声明自身全部处理器；通常由 `#[event_subscriber]` 生成
pub trait EventSubscriber: Send + Sync + 'static {
    fn subscriptions(self: Arc<Self>) -> Vec<HandlerRegistration>;
}
