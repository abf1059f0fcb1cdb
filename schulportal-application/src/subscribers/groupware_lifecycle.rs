use async_trait::async_trait;
use schulportal_domain::event::{PersonDeletedEvent, PersonenkontexteUpdatedEvent};
use schulportal_domain::model::{PersonId, Personenkontext, RoleId, RoleKind};
use schulportal_domain::repository::RoleRepository;
use schulportal_macros::event_subscriber;
use std::sync::Arc;

/// 群件系统出站端口
#[async_trait]
pub trait GroupwarePort: Send + Sync {
    async fn provision_account(&self, person_id: PersonId) -> anyhow::Result<()>;

    async fn deactivate_account(&self, person_id: PersonId) -> anyhow::Result<()>;
}

/// 群件账号只面向教职人员（教师、校领导）
pub struct GroupwareLifecycle {
    groupware: Arc<dyn GroupwarePort>,
    roles: Arc<dyn RoleRepository>,
}

impl GroupwareLifecycle {
    pub fn new(groupware: Arc<dyn GroupwarePort>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { groupware, roles }
    }

    async fn any_staff_role(&self, kontexte: &[Personenkontext]) -> anyhow::Result<bool> {
        let ids: Vec<RoleId> = kontexte.iter().map(|k| k.role_id).collect();
        let roles = self.roles.find_roles(&ids).await?;
        Ok(roles
            .values()
            .any(|r| matches!(r.kind(), RoleKind::Teacher | RoleKind::Leader)))
    }
}

#[event_subscriber]
impl GroupwareLifecycle {
    #[event_handler]
    async fn on_kontexte_updated(
        &self,
        event: &PersonenkontexteUpdatedEvent,
    ) -> anyhow::Result<()> {
        if self.any_staff_role(&event.current).await? {
            if !event.created.is_empty() {
                self.groupware.provision_account(event.person_id).await?;
            }
        } else if self.any_staff_role(&event.deleted).await? {
            self.groupware.deactivate_account(event.person_id).await?;
        }
        Ok(())
    }

    #[event_handler]
    async fn on_person_deleted(&self, event: &PersonDeletedEvent) -> anyhow::Result<()> {
        self.groupware.deactivate_account(event.person_id).await
    }
}
