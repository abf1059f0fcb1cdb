use anyhow::Context;
use async_trait::async_trait;
use schulportal_domain::event::{
    PersonDeletedEvent, PersonenkontextCreatedEvent, PersonenkontextDeletedEvent,
};
use schulportal_domain::model::{OrganisationId, PersonId};
use schulportal_domain::repository::PersonenkontextRepository;
use schulportal_macros::event_subscriber;
use std::sync::Arc;

/// 目录服务出站端口
#[async_trait]
pub trait DirectoryPort: Send + Sync {
    async fn add_membership(
        &self,
        person_id: PersonId,
        organisation_id: OrganisationId,
    ) -> anyhow::Result<()>;

    async fn remove_membership(
        &self,
        person_id: PersonId,
        organisation_id: OrganisationId,
    ) -> anyhow::Result<()>;

    async fn delete_entry(
        &self,
        person_id: PersonId,
        username: Option<&str>,
    ) -> anyhow::Result<()>;
}

/// 把 Personenkontext 变化同步到目录服务的组织成员关系
pub struct DirectorySync {
    directory: Arc<dyn DirectoryPort>,
    kontexte: Arc<dyn PersonenkontextRepository>,
}

impl DirectorySync {
    pub fn new(
        directory: Arc<dyn DirectoryPort>,
        kontexte: Arc<dyn PersonenkontextRepository>,
    ) -> Self {
        Self {
            directory,
            kontexte,
        }
    }
}

#[event_subscriber]
impl DirectorySync {
    #[event_handler]
    async fn on_kontext_created(&self, event: &PersonenkontextCreatedEvent) -> anyhow::Result<()> {
        self.directory
            .add_membership(event.person_id, event.organisation_id)
            .await
            .with_context(|| {
                format!(
                    "add membership of {} in {}",
                    event.person_id, event.organisation_id
                )
            })
    }

    // 同一组织上仍有其他角色时保留成员关系
    #[event_handler]
    async fn on_kontext_deleted(&self, event: &PersonenkontextDeletedEvent) -> anyhow::Result<()> {
        let remaining = self.kontexte.find_kontexte_by_person(&event.person_id).await?;
        if remaining
            .iter()
            .any(|k| k.organisation_id == event.organisation_id)
        {
            tracing::debug!(person = %event.person_id, "membership still backed by another role");
            return Ok(());
        }

        self.directory
            .remove_membership(event.person_id, event.organisation_id)
            .await
            .with_context(|| {
                format!(
                    "remove membership of {} in {}",
                    event.person_id, event.organisation_id
                )
            })
    }

    #[event_handler]
    async fn on_person_deleted(&self, event: &PersonDeletedEvent) -> anyhow::Result<()> {
        self.directory
            .delete_entry(event.person_id, event.username.as_deref())
            .await
            .with_context(|| format!("delete directory entry of {}", event.person_id))
    }
}
