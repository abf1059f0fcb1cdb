use super::{OrganisationId, PersonId, RoleId};
use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::slice::Iter;

/// Personenkontext：一个人在一个组织单元上的一个角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Personenkontext {
    pub person_id: PersonId,
    pub organisation_id: OrganisationId,
    pub role_id: RoleId,
}

impl Personenkontext {
    pub fn new(person_id: PersonId, organisation_id: OrganisationId, role_id: RoleId) -> Self {
        Self {
            person_id,
            organisation_id,
            role_id,
        }
    }
}

/// 批次与该人既有 Personenkontext 的关系
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchScope {
    /// 追加到既有条目之上；规约对照“既有 ∪ 批次”
    #[default]
    Additive,
    /// 批次就是操作完成后该人的全部条目；规约只看批次本身
    Complete,
}

/// 同一人一次请求中待创建/更新的 Personenkontext 集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonenkontextBatch {
    person_id: PersonId,
    kontexte: Vec<Personenkontext>,
    #[serde(default)]
    scope: BatchScope,
}

impl PersonenkontextBatch {
    /// 创建追加批次；所有条目必须属于同一人
    pub fn new(person_id: PersonId, kontexte: Vec<Personenkontext>) -> DomainResult<Self> {
        Self::scoped(person_id, kontexte, BatchScope::Additive)
    }

    /// 创建整体替换批次：批次之外的既有条目将被删除
    pub fn complete(person_id: PersonId, kontexte: Vec<Personenkontext>) -> DomainResult<Self> {
        Self::scoped(person_id, kontexte, BatchScope::Complete)
    }

    fn scoped(
        person_id: PersonId,
        kontexte: Vec<Personenkontext>,
        scope: BatchScope,
    ) -> DomainResult<Self> {
        if let Some(foreign) = kontexte.iter().find(|k| k.person_id != person_id) {
            return Err(DomainError::InvalidValue {
                reason: format!(
                    "batch for person {person_id} contains kontext of person {}",
                    foreign.person_id
                ),
            });
        }

        Ok(Self {
            person_id,
            kontexte,
            scope,
        })
    }

    /// 单条 Personenkontext 构成的追加批次
    pub fn single(kontext: Personenkontext) -> Self {
        Self {
            person_id: kontext.person_id,
            kontexte: vec![kontext],
            scope: BatchScope::Additive,
        }
    }

    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    pub fn scope(&self) -> BatchScope {
        self.scope
    }

    pub fn kontexte(&self) -> &[Personenkontext] {
        &self.kontexte
    }

    pub fn iter(&self) -> Iter<'_, Personenkontext> {
        self.kontexte.iter()
    }

    pub fn len(&self) -> usize {
        self.kontexte.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kontexte.is_empty()
    }

    /// 批次中出现的角色（去重，保持首次出现顺序）
    pub fn role_ids(&self) -> Vec<RoleId> {
        let mut ids: Vec<RoleId> = Vec::with_capacity(self.kontexte.len());
        for k in &self.kontexte {
            if !ids.contains(&k.role_id) {
                ids.push(k.role_id);
            }
        }
        ids
    }
}

impl<'a> IntoIterator for &'a PersonenkontextBatch {
    type Item = &'a Personenkontext;
    type IntoIter = Iter<'a, Personenkontext>;

    fn into_iter(self) -> Self::IntoIter {
        self.kontexte.iter()
    }
}
