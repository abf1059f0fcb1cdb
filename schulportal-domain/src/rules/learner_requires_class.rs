use super::known_kontexte;
use crate::error::DomainResult;
use crate::model::{OrganisationId, PersonenkontextBatch, RoleKind};
use crate::repository::{OrganisationRepository, PersonenkontextRepository, RoleRepository};
use crate::specification::Specification;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// 学习者必须属于班级
///
/// 批次中任一角色为学习者类别时，批次执行后的 Personenkontext 中至少有一条指向班级。
pub struct LearnerRequiresClass {
    organisations: Arc<dyn OrganisationRepository>,
    roles: Arc<dyn RoleRepository>,
    kontexte: Arc<dyn PersonenkontextRepository>,
}

impl LearnerRequiresClass {
    pub fn new(
        organisations: Arc<dyn OrganisationRepository>,
        roles: Arc<dyn RoleRepository>,
        kontexte: Arc<dyn PersonenkontextRepository>,
    ) -> Self {
        Self {
            organisations,
            roles,
            kontexte,
        }
    }
}

#[async_trait]
impl Specification<PersonenkontextBatch> for LearnerRequiresClass {
    async fn is_satisfied_by(&self, batch: &PersonenkontextBatch) -> DomainResult<bool> {
        let roles = self.roles.find_roles(&batch.role_ids()).await?;
        let assigns_learner = roles.values().any(|r| r.kind() == RoleKind::Learner);
        if !assigns_learner {
            return Ok(true);
        }

        let known = known_kontexte(self.kontexte.as_ref(), batch).await?;
        let mut visited: HashSet<OrganisationId> = HashSet::new();
        for k in &known {
            if !visited.insert(k.organisation_id) {
                continue;
            }
            let organisation = self.organisations.find_organisation(&k.organisation_id).await?;
            if organisation.is_some_and(|o| o.is_class()) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
