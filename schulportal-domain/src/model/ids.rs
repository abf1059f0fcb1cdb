use schulportal_macros::entity_id;
use uuid::Uuid;

/// 人员标识
#[entity_id]
pub struct PersonId(Uuid);

/// 组织单元标识
#[entity_id]
pub struct OrganisationId(Uuid);

/// 角色标识
#[entity_id]
pub struct RoleId(Uuid);

impl PersonId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl OrganisationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl RoleId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}
