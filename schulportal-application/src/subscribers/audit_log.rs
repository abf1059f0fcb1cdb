use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schulportal_domain::event::{
    DomainEvent, OrganisationDeletedEvent, PersonDeletedEvent, PersonenkontextCreatedEvent,
    PersonenkontextDeletedEvent, PersonenkontexteUpdatedEvent,
};
use schulportal_macros::event_subscriber;
use serde::Serialize;
use std::sync::Arc;

/// 一条审计记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub event: &'static str,
    pub recorded_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

/// 审计落地端口
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> anyhow::Result<()>;
}

/// 写入 `audit` target 的日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditEntry) -> anyhow::Result<()> {
        let line = serde_json::to_string(&entry)?;
        tracing::info!(target: "audit", event = entry.event, entry = %line, "audit");
        Ok(())
    }
}

/// 记录全部领域事件
pub struct AuditLog {
    sink: Arc<dyn AuditSink>,
}

impl AuditLog {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    async fn write<E>(&self, event: &E) -> anyhow::Result<()>
    where
        E: DomainEvent,
    {
        let entry = AuditEntry {
            event: event.event_name(),
            recorded_at: Utc::now(),
            payload: serde_json::to_value(event)?,
        };
        self.sink.record(entry).await
    }
}

#[event_subscriber]
impl AuditLog {
    #[event_handler]
    async fn on_kontext_created(&self, event: &PersonenkontextCreatedEvent) -> anyhow::Result<()> {
        self.write(event).await
    }

    #[event_handler]
    async fn on_kontext_deleted(&self, event: &PersonenkontextDeletedEvent) -> anyhow::Result<()> {
        self.write(event).await
    }

    #[event_handler]
    async fn on_kontexte_updated(
        &self,
        event: &PersonenkontexteUpdatedEvent,
    ) -> anyhow::Result<()> {
        self.write(event).await
    }

    #[event_handler]
    async fn on_person_deleted(&self, event: &PersonDeletedEvent) -> anyhow::Result<()> {
        self.write(event).await
    }

    #[event_handler]
    async fn on_organisation_deleted(
        &self,
        event: &OrganisationDeletedEvent,
    ) -> anyhow::Result<()> {
        self.write(event).await
    }
}
