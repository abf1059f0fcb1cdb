use super::known_kontexte;
use crate::error::DomainResult;
use crate::model::{Personenkontext, PersonenkontextBatch};
use crate::repository::{OrganisationRepository, PersonenkontextRepository};
use crate::specification::Specification;
use async_trait::async_trait;
use std::sync::Arc;

/// 班级上的角色必须映射学校上的同一角色
///
/// 目标组织是班级时，该人必须在班级的管理学校上已持有同一角色；
/// 班级缺少管理学校时同样不满足。非班级目标不受此规则约束，
/// 组织不存在交由相容性规则处理。
pub struct ClassRoleMirrorsSchool {
    organisations: Arc<dyn OrganisationRepository>,
    kontexte: Arc<dyn PersonenkontextRepository>,
}

impl ClassRoleMirrorsSchool {
    pub fn new(
        organisations: Arc<dyn OrganisationRepository>,
        kontexte: Arc<dyn PersonenkontextRepository>,
    ) -> Self {
        Self {
            organisations,
            kontexte,
        }
    }

    async fn mirrored_in(
        &self,
        candidate: &Personenkontext,
        known: &[Personenkontext],
    ) -> DomainResult<bool> {
        let Some(organisation) = self
            .organisations
            .find_organisation(&candidate.organisation_id)
            .await?
        else {
            return Ok(true);
        };
        if !organisation.is_class() {
            return Ok(true);
        }
        let Some(school) = organisation.administered_by() else {
            return Ok(false);
        };

        Ok(known
            .iter()
            .any(|k| k.organisation_id == school && k.role_id == candidate.role_id))
    }
}

/// 对照批次执行后的状态：追加批次可借助已有的学校角色，
/// 同一批次也可同时带上学校与班级上的角色
#[async_trait]
impl Specification<PersonenkontextBatch> for ClassRoleMirrorsSchool {
    async fn is_satisfied_by(&self, batch: &PersonenkontextBatch) -> DomainResult<bool> {
        let known = known_kontexte(self.kontexte.as_ref(), batch).await?;
        for candidate in batch {
            if !self.mirrored_in(candidate, &known).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrganisationType, PersonId, RoleKind};
    use crate::rules::fixtures::{directory, organisation, role};

    #[tokio::test]
    async fn class_role_requires_same_role_at_school() {
        let dir = directory();
        let school = organisation(&dir, OrganisationType::School, None);
        let class = organisation(&dir, OrganisationType::Class, Some(school));
        let teacher = role(&dir, RoleKind::Teacher);
        let leader = role(&dir, RoleKind::Leader);
        let person = PersonId::generate();
        dir.insert_kontext(Personenkontext::new(person, school, teacher))
            .unwrap();

        let spec = ClassRoleMirrorsSchool::new(dir.clone(), dir.clone());
        let same = PersonenkontextBatch::single(Personenkontext::new(person, class, teacher));
        assert!(spec.is_satisfied_by(&same).await.unwrap());

        let other = PersonenkontextBatch::single(Personenkontext::new(person, class, leader));
        assert!(!spec.is_satisfied_by(&other).await.unwrap());
    }

    #[tokio::test]
    async fn class_without_school_link_fails() {
        let dir = directory();
        let orphan = organisation(&dir, OrganisationType::Class, None);
        let learner = role(&dir, RoleKind::Learner);
        let spec = ClassRoleMirrorsSchool::new(dir.clone(), dir.clone());

        let candidate = Personenkontext::new(PersonId::generate(), orphan, learner);
        let batch = PersonenkontextBatch::single(candidate);
        assert!(!spec.is_satisfied_by(&batch).await.unwrap());
    }

    #[tokio::test]
    async fn batch_may_bring_its_own_school_kontext() {
        let dir = directory();
        let school = organisation(&dir, OrganisationType::School, None);
        let class = organisation(&dir, OrganisationType::Class, Some(school));
        let learner = role(&dir, RoleKind::Learner);
        let person = PersonId::generate();
        let spec = ClassRoleMirrorsSchool::new(dir.clone(), dir.clone());

        let batch = PersonenkontextBatch::new(
            person,
            vec![
                Personenkontext::new(person, class, learner),
                Personenkontext::new(person, school, learner),
            ],
        )
        .unwrap();
        assert!(spec.is_satisfied_by(&batch).await.unwrap());

        let class_only = PersonenkontextBatch::single(Personenkontext::new(person, class, learner));
        assert!(!spec.is_satisfied_by(&class_only).await.unwrap());
    }

    #[tokio::test]
    async fn complete_batch_cannot_lean_on_replaced_school_kontext() {
        let dir = directory();
        let school = organisation(&dir, OrganisationType::School, None);
        let class = organisation(&dir, OrganisationType::Class, Some(school));
        let teacher = role(&dir, RoleKind::Teacher);
        let person = PersonId::generate();
        dir.insert_kontext(Personenkontext::new(person, school, teacher))
            .unwrap();
        let spec = ClassRoleMirrorsSchool::new(dir.clone(), dir.clone());

        let class_only = vec![Personenkontext::new(person, class, teacher)];
        let additive = PersonenkontextBatch::new(person, class_only.clone()).unwrap();
        assert!(spec.is_satisfied_by(&additive).await.unwrap());

        let complete = PersonenkontextBatch::complete(person, class_only).unwrap();
        assert!(!spec.is_satisfied_by(&complete).await.unwrap());
    }
}
