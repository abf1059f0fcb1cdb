//! 内存版目录（InMemoryDirectory）
//!
//! 同时实现全部查询端口与写入端口，典型用途：测试环境、示例与本地开发。
//! 锁中毒视为依赖解析失败。

use super::{
    OrganisationRepository, PersonenkontextRepository, PersonenkontextWriter, RoleRepository,
};
use crate::error::{DomainError, DomainResult as Result};
use crate::model::{
    Organisation, OrganisationId, PersonId, Personenkontext, Role, RoleId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
pub struct InMemoryDirectory {
    organisations: RwLock<HashMap<OrganisationId, Organisation>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    kontexte: RwLock<Vec<Personenkontext>>,
}

fn poisoned<T>(resource: &'static str) -> impl FnOnce(PoisonError<T>) -> DomainError {
    move |_| DomainError::lookup(resource, "lock poisoned")
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_organisation(&self, organisation: Organisation) -> Result<()> {
        self.organisations
            .write()
            .map_err(poisoned("organisation"))?
            .insert(organisation.id(), organisation);
        Ok(())
    }

    pub fn insert_role(&self, role: Role) -> Result<()> {
        self.roles
            .write()
            .map_err(poisoned("role"))?
            .insert(role.id(), role);
        Ok(())
    }

    /// 直接写入一条既有 Personenkontext（不经过规则校验，用于准备数据）
    pub fn insert_kontext(&self, kontext: Personenkontext) -> Result<()> {
        let mut kontexte = self.kontexte.write().map_err(poisoned("personenkontext"))?;
        if !kontexte.contains(&kontext) {
            kontexte.push(kontext);
        }
        Ok(())
    }

    pub fn kontext_count(&self) -> Result<usize> {
        Ok(self
            .kontexte
            .read()
            .map_err(poisoned("personenkontext"))?
            .len())
    }
}

#[async_trait]
impl OrganisationRepository for InMemoryDirectory {
    async fn find_organisation(&self, id: &OrganisationId) -> Result<Option<Organisation>> {
        Ok(self
            .organisations
            .read()
            .map_err(poisoned("organisation"))?
            .get(id)
            .cloned())
    }
}

#[async_trait]
impl RoleRepository for InMemoryDirectory {
    async fn find_role(&self, id: &RoleId) -> Result<Option<Role>> {
        Ok(self.roles.read().map_err(poisoned("role"))?.get(id).cloned())
    }

    async fn find_roles(&self, ids: &[RoleId]) -> Result<HashMap<RoleId, Role>> {
        let roles = self.roles.read().map_err(poisoned("role"))?;
        Ok(ids
            .iter()
            .filter_map(|id| roles.get(id).map(|r| (*id, r.clone())))
            .collect())
    }
}

#[async_trait]
impl PersonenkontextRepository for InMemoryDirectory {
    async fn find_kontexte_by_person(&self, person_id: &PersonId) -> Result<Vec<Personenkontext>> {
        Ok(self
            .kontexte
            .read()
            .map_err(poisoned("personenkontext"))?
            .iter()
            .filter(|k| k.person_id == *person_id)
            .copied()
            .collect())
    }
}

#[async_trait]
impl PersonenkontextWriter for InMemoryDirectory {
    async fn save(&self, kontext: &Personenkontext) -> Result<()> {
        self.insert_kontext(*kontext)
    }

    async fn delete(&self, kontext: &Personenkontext) -> Result<bool> {
        let mut kontexte = self.kontexte.write().map_err(poisoned("personenkontext"))?;
        let before = kontexte.len();
        kontexte.retain(|k| k != kontext);
        Ok(before != kontexte.len())
    }
}
