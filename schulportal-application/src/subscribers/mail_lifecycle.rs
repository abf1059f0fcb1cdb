use async_trait::async_trait;
use schulportal_domain::event::{
    PersonDeletedEvent, PersonenkontextCreatedEvent, PersonenkontextDeletedEvent,
    PersonenkontexteUpdatedEvent,
};
use schulportal_domain::model::PersonId;
use schulportal_domain::repository::PersonenkontextRepository;
use schulportal_macros::event_subscriber;
use std::sync::Arc;

/// 邮件系统出站端口
#[async_trait]
pub trait MailPort: Send + Sync {
    async fn ensure_mailbox(&self, person_id: PersonId) -> anyhow::Result<()>;

    async fn disable_mailbox(&self, person_id: PersonId) -> anyhow::Result<()>;

    async fn delete_mailbox(&self, person_id: PersonId) -> anyhow::Result<()>;
}

/// 邮箱生命周期：有 Personenkontext 时启用，失去最后一条时停用，人员删除时删除
pub struct MailLifecycle {
    mail: Arc<dyn MailPort>,
    kontexte: Arc<dyn PersonenkontextRepository>,
}

impl MailLifecycle {
    pub fn new(mail: Arc<dyn MailPort>, kontexte: Arc<dyn PersonenkontextRepository>) -> Self {
        Self { mail, kontexte }
    }
}

#[event_subscriber]
impl MailLifecycle {
    /// 开通邮箱可重复调用，单条创建与整体更新都会触发
    #[event_handler]
    async fn on_kontext_created(&self, event: &PersonenkontextCreatedEvent) -> anyhow::Result<()> {
        self.mail.ensure_mailbox(event.person_id).await
    }

    #[event_handler]
    async fn on_kontexte_updated(
        &self,
        event: &PersonenkontexteUpdatedEvent,
    ) -> anyhow::Result<()> {
        if event.current.is_empty() {
            self.mail.disable_mailbox(event.person_id).await
        } else if !event.created.is_empty() {
            self.mail.ensure_mailbox(event.person_id).await
        } else {
            Ok(())
        }
    }

    #[event_handler]
    async fn on_kontext_deleted(&self, event: &PersonenkontextDeletedEvent) -> anyhow::Result<()> {
        let remaining = self.kontexte.find_kontexte_by_person(&event.person_id).await?;
        if !remaining.is_empty() {
            return Ok(());
        }

        tracing::info!(
            person = %event.person_id,
            "last personenkontext removed, disabling mailbox"
        );
        self.mail.disable_mailbox(event.person_id).await
    }

    #[event_handler]
    async fn on_person_deleted(&self, event: &PersonDeletedEvent) -> anyhow::Result<()> {
        self.mail.delete_mailbox(event.person_id).await
    }
}
