use super::known_kontexte;
use crate::error::DomainResult;
use crate::model::{PersonenkontextBatch, RoleId};
use crate::repository::{PersonenkontextRepository, RoleRepository};
use crate::specification::Specification;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// 角色类别一致
///
/// 批次执行后该人持有的全部角色必须属于同一类别；
/// 任一角色无法解析时视为不满足。
pub struct UniformRoleKind {
    roles: Arc<dyn RoleRepository>,
    kontexte: Arc<dyn PersonenkontextRepository>,
}

impl UniformRoleKind {
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        kontexte: Arc<dyn PersonenkontextRepository>,
    ) -> Self {
        Self { roles, kontexte }
    }
}

#[async_trait]
impl Specification<PersonenkontextBatch> for UniformRoleKind {
    async fn is_satisfied_by(&self, batch: &PersonenkontextBatch) -> DomainResult<bool> {
        let known = known_kontexte(self.kontexte.as_ref(), batch).await?;

        let mut role_ids: Vec<RoleId> = Vec::with_capacity(known.len());
        for k in &known {
            if !role_ids.contains(&k.role_id) {
                role_ids.push(k.role_id);
            }
        }
        let roles = self.roles.find_roles(&role_ids).await?;

        let mut kinds = HashSet::new();
        for id in &role_ids {
            match roles.get(id) {
                Some(role) => {
                    kinds.insert(role.kind());
                }
                None => return Ok(false),
            }
        }

        Ok(kinds.len() <= 1)
    }
}
