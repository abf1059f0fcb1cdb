//! 事件总线（EventBus）
//!
//! 进程级路由表：事件具体类型 → 按注册顺序排列的订阅列表。
//! - 同一 (事件类型, 订阅者标识) 至多一条订阅；重复注册原位替换处理器；
//! - 发布时先对订阅列表做快照，扇出过程中的订阅/退订不影响本次投递，
//!   因此处理器内部可以安全地订阅或退订其他处理器；
//! - 发布方永远不会看到处理器的失败；
//! - `publish` 需要在 tokio 运行时内调用，运行时之外的事件只记录错误并被丢弃。
//!
//! 由装配代码显式构造，以 `Arc<EventBus>` 注入需要发布或订阅的组件，
//! 关闭时调用 `unsubscribe_all` 释放全部处理器。
//!
use super::handler::{ErasedHandler, EventHandler, erase};
use super::publish::{PublishHandle, PublishReport, Target, drive, invoke};
use super::registration::{EventSubscriber, HandlerRegistration};
use super::subscription::{SubscriberId, Subscription};
use crate::event::DomainEvent;
use dashmap::DashMap;
use std::any::TypeId;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

struct Entry {
    /// 全局注册序号；列表始终按它升序排列
    position: u64,
    target: Target,
}

/// 进程内事件总线
///
/// `publish` 把扇出交给当前 tokio 运行时驱动；在运行时之外调用时，
/// 本次事件不会投递给任何处理器，只留下一条 `error` 级日志，
/// 返回的句柄报告零次投递。确实需要在运行时之外发布时，
/// 应自行进入运行时并使用 `publish_and_wait`。
pub struct EventBus {
    routes: DashMap<TypeId, Vec<Entry>>,
    next_position: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            routes: DashMap::new(),
            next_position: AtomicU64::new(0),
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅实现了 `EventHandler<E>` 的处理器
    pub fn subscribe<E, H>(
        &self,
        subscriber_id: impl Into<SubscriberId>,
        handler: Arc<H>,
    ) -> Subscription
    where
        E: DomainEvent,
        H: EventHandler<E> + 'static,
    {
        self.subscribe_fn::<E, _, _>(subscriber_id, move |event: Arc<E>| {
            let handler = Arc::clone(&handler);
            async move { handler.handle(&event).await }
        })
    }

    /// 以闭包订阅
    pub fn subscribe_fn<E, F, Fut>(
        &self,
        subscriber_id: impl Into<SubscriberId>,
        f: F,
    ) -> Subscription
    where
        E: DomainEvent,
        F: Fn(Arc<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.insert(
            TypeId::of::<E>(),
            E::NAME,
            subscriber_id.into(),
            erase::<E, _, _>(f),
        )
    }

    /// 订阅一条处理器声明
    pub fn register(&self, registration: HandlerRegistration) -> Subscription {
        let HandlerRegistration {
            event_type,
            event_name,
            subscriber_id,
            handler,
        } = registration;
        self.insert(event_type, event_name, subscriber_id, handler)
    }

    /// 订阅组件声明的全部处理器，按声明顺序
    pub fn register_subscriber<S>(&self, subscriber: Arc<S>) -> Vec<Subscription>
    where
        S: EventSubscriber + ?Sized,
    {
        subscriber
            .subscriptions()
            .into_iter()
            .map(|r| self.register(r))
            .collect()
    }

    fn insert(
        &self,
        event_type: TypeId,
        event_name: &'static str,
        subscriber_id: SubscriberId,
        handler: ErasedHandler,
    ) -> Subscription {
        {
            let mut entries = self.routes.entry(event_type).or_default();
            let target = Target {
                subscriber_id: subscriber_id.clone(),
                handler,
            };

            if let Some(existing) = entries
                .iter_mut()
                .find(|e| e.target.subscriber_id == subscriber_id)
            {
                existing.target = target;
                tracing::debug!(
                    event = event_name,
                    subscriber = %subscriber_id,
                    position = existing.position,
                    "subscription replaced"
                );
            } else {
                let position = self.next_position.fetch_add(1, Ordering::Relaxed);
                entries.push(Entry { position, target });
                tracing::debug!(
                    event = event_name,
                    subscriber = %subscriber_id,
                    position,
                    "subscribed"
                );
            }
        }

        Subscription {
            event_type,
            event_name,
            subscriber_id,
        }
    }

    /// 退订；幂等，返回是否确实移除了订阅
    pub fn unsubscribe<E>(&self, subscriber_id: &SubscriberId) -> bool
    where
        E: DomainEvent,
    {
        self.remove(TypeId::of::<E>(), E::NAME, subscriber_id)
    }

    /// 按订阅回执退订；幂等
    pub fn cancel(&self, subscription: &Subscription) -> bool {
        self.remove(
            subscription.event_type,
            subscription.event_name,
            &subscription.subscriber_id,
        )
    }

    fn remove(
        &self,
        event_type: TypeId,
        event_name: &'static str,
        subscriber_id: &SubscriberId,
    ) -> bool {
        let removed = if let Some(mut entries) = self.routes.get_mut(&event_type) {
            let before = entries.len();
            entries.retain(|e| e.target.subscriber_id != *subscriber_id);
            before != entries.len()
        } else {
            false
        };
        self.routes.remove_if(&event_type, |_, entries| entries.is_empty());

        if removed {
            tracing::debug!(event = event_name, subscriber = %subscriber_id, "unsubscribed");
        }
        removed
    }

    /// 释放全部订阅（进程/模块关闭时调用），返回释放的数量
    pub fn unsubscribe_all(&self) -> usize {
        let event_types: Vec<TypeId> = self.routes.iter().map(|r| *r.key()).collect();
        let released = event_types
            .iter()
            .filter_map(|t| self.routes.remove(t))
            .map(|(_, entries)| entries.len())
            .sum();

        tracing::info!(released, "event bus subscriptions released");
        released
    }

    /// 某事件类型当前的订阅数
    pub fn subscriber_count<E>(&self) -> usize
    where
        E: DomainEvent,
    {
        self.routes
            .get(&TypeId::of::<E>())
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// 某事件类型当前的订阅者（按投递顺序）
    pub fn subscribers<E>(&self) -> Vec<SubscriberId>
    where
        E: DomainEvent,
    {
        self.snapshot(TypeId::of::<E>())
            .into_iter()
            .map(|t| t.subscriber_id)
            .collect()
    }

    fn snapshot(&self, event_type: TypeId) -> Vec<Target> {
        self.routes
            .get(&event_type)
            .map(|entries| entries.iter().map(|e| e.target.clone()).collect())
            .unwrap_or_default()
    }

    /// 发布事件：即发即弃
    ///
    /// 在调用内按注册顺序调用各处理器，随后在当前 tokio 运行时上驱动它们完成。
    /// 返回的句柄可用于等待扇出结束；直接丢弃不会取消投递。
    /// 没有运行时时记录错误并丢弃本次投递，不会 panic。
    pub fn publish<E>(&self, event: E) -> PublishHandle
    where
        E: DomainEvent,
    {
        let targets = self.snapshot(TypeId::of::<E>());
        tracing::debug!(event = E::NAME, subscribers = targets.len(), "publishing event");
        if targets.is_empty() {
            return PublishHandle::ready(E::NAME);
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(event = E::NAME, error = %e, "no async runtime, event dropped");
                return PublishHandle::ready(E::NAME);
            }
        };

        let invocations = invoke(Arc::new(event), targets);
        PublishHandle::spawned(E::NAME, runtime.spawn(drive(E::NAME, invocations)))
    }

    /// 发布并在当前任务中等待全部处理器结束
    pub async fn publish_and_wait<E>(&self, event: E) -> PublishReport
    where
        E: DomainEvent,
    {
        let targets = self.snapshot(TypeId::of::<E>());
        tracing::debug!(event = E::NAME, subscribers = targets.len(), "publishing event");
        if targets.is_empty() {
            return PublishReport::empty(E::NAME);
        }

        drive(E::NAME, invoke(Arc::new(event), targets)).await
    }
}
