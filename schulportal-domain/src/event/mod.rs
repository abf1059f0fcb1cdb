//! 领域事件
//!
//! 事件是不可变的“已发生事实”，只存在于一次发布调用期间，不会被持久化。
//! 路由键是事件的具体类型（`TypeId`），结构相同但类型不同的事件不会被一同路由；
//! `DomainEvent::NAME` 仅作为日志与审计中的稳定名称。

mod organisation;
mod person;
mod personenkontext;

pub use organisation::OrganisationDeletedEvent;
pub use person::PersonDeletedEvent;
pub use personenkontext::{
    PersonenkontextCreatedEvent, PersonenkontextDeletedEvent, PersonenkontexteUpdatedEvent,
};

use serde::Serialize;
use std::any::Any;
use std::fmt;

/// 所有领域事件的公共形状；通常通过 `#[domain_event]` 实现
pub trait DomainEvent: Any + Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// 稳定的事件名（如 `personenkontext.deleted`）
    const NAME: &'static str;

    fn event_name(&self) -> &'static str {
        Self::NAME
    }
}
