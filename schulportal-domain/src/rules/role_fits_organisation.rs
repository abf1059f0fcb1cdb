use crate::error::DomainResult;
use crate::model::Personenkontext;
use crate::repository::{OrganisationRepository, RoleRepository};
use crate::specification::Specification;
use async_trait::async_trait;
use std::sync::Arc;

/// 角色类别与组织类型相容
///
/// 角色或组织不存在时视为不满足。
pub struct RoleFitsOrganisationType {
    organisations: Arc<dyn OrganisationRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl RoleFitsOrganisationType {
    pub fn new(
        organisations: Arc<dyn OrganisationRepository>,
        roles: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            organisations,
            roles,
        }
    }
}

#[async_trait]
impl Specification<Personenkontext> for RoleFitsOrganisationType {
    async fn is_satisfied_by(&self, candidate: &Personenkontext) -> DomainResult<bool> {
        let Some(organisation) = self
            .organisations
            .find_organisation(&candidate.organisation_id)
            .await?
        else {
            return Ok(false);
        };
        let Some(role) = self.roles.find_role(&candidate.role_id).await? else {
            return Ok(false);
        };

        Ok(role.kind().permits(organisation.kind()))
    }
}
