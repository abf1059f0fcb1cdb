use anyhow::Context;
use async_trait::async_trait;
use schulportal_domain::event::{
    OrganisationDeletedEvent, PersonenkontextCreatedEvent, PersonenkontextDeletedEvent,
};
use schulportal_domain::model::{OrganisationId, OrganisationType, PersonId, RoleKind};
use schulportal_domain::repository::{OrganisationRepository, RoleRepository};
use schulportal_macros::event_subscriber;
use std::sync::Arc;

/// 学习平台出站端口；每个班级对应一门课程
#[async_trait]
pub trait LearningPlatformPort: Send + Sync {
    async fn enrol(
        &self,
        person_id: PersonId,
        course: OrganisationId,
        kind: RoleKind,
    ) -> anyhow::Result<()>;

    async fn unenrol(&self, person_id: PersonId, course: OrganisationId) -> anyhow::Result<()>;

    async fn archive_course(&self, course: OrganisationId) -> anyhow::Result<()>;
}

/// 把班级上的 Personenkontext 同步为学习平台的课程成员
pub struct LearningPlatformSync {
    platform: Arc<dyn LearningPlatformPort>,
    organisations: Arc<dyn OrganisationRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl LearningPlatformSync {
    pub fn new(
        platform: Arc<dyn LearningPlatformPort>,
        organisations: Arc<dyn OrganisationRepository>,
        roles: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            platform,
            organisations,
            roles,
        }
    }

    async fn is_course(&self, organisation_id: &OrganisationId) -> anyhow::Result<bool> {
        Ok(self
            .organisations
            .find_organisation(organisation_id)
            .await?
            .is_some_and(|o| o.is_class()))
    }
}

#[event_subscriber]
impl LearningPlatformSync {
    #[event_handler]
    async fn on_kontext_created(&self, event: &PersonenkontextCreatedEvent) -> anyhow::Result<()> {
        if !self.is_course(&event.organisation_id).await? {
            return Ok(());
        }

        let role = self
            .roles
            .find_role(&event.role_id)
            .await?
            .with_context(|| format!("role {} not found", event.role_id))?;
        self.platform
            .enrol(event.person_id, event.organisation_id, role.kind())
            .await
    }

    #[event_handler]
    async fn on_kontext_deleted(&self, event: &PersonenkontextDeletedEvent) -> anyhow::Result<()> {
        if !self.is_course(&event.organisation_id).await? {
            return Ok(());
        }
        self.platform
            .unenrol(event.person_id, event.organisation_id)
            .await
    }

    #[event_handler]
    async fn on_organisation_deleted(
        &self,
        event: &OrganisationDeletedEvent,
    ) -> anyhow::Result<()> {
        if event.kind != OrganisationType::Class {
            return Ok(());
        }
        self.platform.archive_course(event.organisation_id).await
    }
}
