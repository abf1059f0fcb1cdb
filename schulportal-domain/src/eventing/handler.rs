//! 事件处理器（EventHandler）与类型擦除
//!
use crate::event::DomainEvent;
use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

/// 事件处理器：处理某一具体事件类型
#[async_trait]
pub trait EventHandler<E>: Send + Sync
where
    E: DomainEvent,
{
    async fn handle(&self, event: &E) -> anyhow::Result<()>;
}

pub(crate) type AnyEvent = Arc<dyn Any + Send + Sync>;

pub(crate) type HandlerFuture = BoxFuture<'static, anyhow::Result<()>>;

/// 类型擦除后的处理器：键与闭包出自同一泛型 E，正常情况下 downcast 不会失败
pub(crate) type ErasedHandler = Arc<dyn Fn(AnyEvent) -> HandlerFuture + Send + Sync>;

pub(crate) fn erase<E, F, Fut>(f: F) -> ErasedHandler
where
    E: DomainEvent,
    F: Fn(Arc<E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |event: AnyEvent| match event.downcast::<E>() {
        Ok(event) => f(event).boxed(),
        Err(_) => future::ready(Err(anyhow::anyhow!(
            "event type mismatch: expected {}",
            E::NAME
        )))
        .boxed(),
    })
}
