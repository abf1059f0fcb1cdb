//! Personenkontext 领域规约
//!
//! 每条规约编码一条跨聚合的一致性规则，只通过只读仓储端口解析依赖，
//! 返回布尔结果，不构造错误对象；由哪条规约导致拒绝，由聚合器决定。
//!
//! - `RoleFitsOrganisationType`：角色类别必须与组织类型相容；
//! - `ClassRoleMirrorsSchool`：在班级上的角色必须在其所属学校上已有同一角色；
//! - `UniformRoleKind`：同一人的全部角色类别必须一致；
//! - `LearnerRequiresClass`：含学习者角色时，至少一个 Personenkontext 指向班级；
//! - `ForEachKontext`：把单条规约提升为“批次中每一条都满足”。
//!
//! 批次规约对照的是操作完成后该人将持有的 Personenkontext：
//! 追加批次为“既有 ∪ 批次”，整体替换批次只看批次本身。

mod class_mirrors_school;
mod for_each;
mod learner_requires_class;
mod role_fits_organisation;
mod uniform_role_kind;

pub use class_mirrors_school::ClassRoleMirrorsSchool;
pub use for_each::ForEachKontext;
pub use learner_requires_class::LearnerRequiresClass;
pub use role_fits_organisation::RoleFitsOrganisationType;
pub use uniform_role_kind::UniformRoleKind;

use crate::error::DomainResult;
use crate::model::{BatchScope, Personenkontext, PersonenkontextBatch};
use crate::repository::PersonenkontextRepository;

/// 批次生效后该人持有的 Personenkontext（重复项只保留一次）
async fn known_kontexte(
    repository: &dyn PersonenkontextRepository,
    batch: &PersonenkontextBatch,
) -> DomainResult<Vec<Personenkontext>> {
    let mut known = match batch.scope() {
        BatchScope::Additive => {
            repository
                .find_kontexte_by_person(&batch.person_id())
                .await?
        }
        BatchScope::Complete => Vec::with_capacity(batch.len()),
    };
    for k in batch {
        if !known.contains(k) {
            known.push(*k);
        }
    }
    Ok(known)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{
        Organisation, OrganisationId, OrganisationType, Role, RoleId, RoleKind,
    };
    use crate::repository::InMemoryDirectory;
    use std::sync::Arc;

    pub(crate) fn directory() -> Arc<InMemoryDirectory> {
        Arc::new(InMemoryDirectory::new())
    }

    pub(crate) fn organisation(
        dir: &InMemoryDirectory,
        kind: OrganisationType,
        administered_by: Option<OrganisationId>,
    ) -> OrganisationId {
        let id = OrganisationId::generate();
        dir.insert_organisation(
            Organisation::builder()
                .id(id)
                .name(format!("{kind} {id}"))
                .kind(kind)
                .maybe_administered_by(administered_by)
                .build(),
        )
        .unwrap();
        id
    }

    pub(crate) fn role(dir: &InMemoryDirectory, kind: RoleKind) -> RoleId {
        let id = RoleId::generate();
        dir.insert_role(Role::builder().id(id).name(kind.as_str()).kind(kind).build())
            .unwrap();
        id
    }
}
