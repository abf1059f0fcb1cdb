//! 仓储端口（只读查询 + Personenkontext 写入）
//!
//! 规约只依赖只读查询端口；写入端口仅在聚合器未报告违规之后才会被调用。
//! 查询失败以 `DomainError::Lookup` 返回，不存在以 `Ok(None)` / 空集合表达。
//!
mod memory;

pub use memory::InMemoryDirectory;

use crate::error::DomainResult;
use crate::model::{
    Organisation, OrganisationId, PersonId, Personenkontext, Role, RoleId,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// 组织单元查询
#[async_trait]
pub trait OrganisationRepository: Send + Sync {
    async fn find_organisation(&self, id: &OrganisationId) -> DomainResult<Option<Organisation>>;
}

/// 角色查询
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_role(&self, id: &RoleId) -> DomainResult<Option<Role>>;

    /// 批量查询；缺失的角色不会出现在结果中
    async fn find_roles(&self, ids: &[RoleId]) -> DomainResult<HashMap<RoleId, Role>> {
        let mut found = HashMap::with_capacity(ids.len());
        for id in ids {
            if let Some(role) = self.find_role(id).await? {
                found.insert(*id, role);
            }
        }
        Ok(found)
    }
}

/// 既有 Personenkontext 查询
#[async_trait]
pub trait PersonenkontextRepository: Send + Sync {
    async fn find_kontexte_by_person(&self, person_id: &PersonId)
    -> DomainResult<Vec<Personenkontext>>;
}

/// Personenkontext 写入（持久化技术由基础设施层决定）
#[async_trait]
pub trait PersonenkontextWriter: Send + Sync {
    async fn save(&self, kontext: &Personenkontext) -> DomainResult<()>;

    /// 删除；返回是否确实删除了条目
    async fn delete(&self, kontext: &Personenkontext) -> DomainResult<bool>;
}
