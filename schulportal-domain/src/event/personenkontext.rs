use crate::model::{OrganisationId, PersonId, Personenkontext, RoleId};
use schulportal_macros::domain_event;

/// Personenkontext 已创建
#[domain_event(name = "personenkontext.created")]
pub struct PersonenkontextCreatedEvent {
    pub person_id: PersonId,
    pub organisation_id: OrganisationId,
    pub role_id: RoleId,
}

/// Personenkontext 已删除
#[domain_event(name = "personenkontext.deleted")]
pub struct PersonenkontextDeletedEvent {
    pub person_id: PersonId,
    pub organisation_id: OrganisationId,
    pub role_id: RoleId,
}

/// 一个人的 Personenkontext 集合被整体更新
#[domain_event(name = "personenkontexte.updated")]
pub struct PersonenkontexteUpdatedEvent {
    pub person_id: PersonId,
    pub created: Vec<Personenkontext>,
    pub deleted: Vec<Personenkontext>,
    /// 更新完成后该人的全部 Personenkontext
    pub current: Vec<Personenkontext>,
}

impl From<Personenkontext> for PersonenkontextCreatedEvent {
    fn from(k: Personenkontext) -> Self {
        Self {
            person_id: k.person_id,
            organisation_id: k.organisation_id,
            role_id: k.role_id,
        }
    }
}

impl From<Personenkontext> for PersonenkontextDeletedEvent {
    fn from(k: Personenkontext) -> Self {
        Self {
            person_id: k.person_id,
            organisation_id: k.organisation_id,
            role_id: k.role_id,
        }
    }
}

impl PersonenkontextDeletedEvent {
    pub fn kontext(&self) -> Personenkontext {
        Personenkontext::new(self.person_id, self.organisation_id, self.role_id)
    }
}

impl PersonenkontextCreatedEvent {
    pub fn kontext(&self) -> Personenkontext {
        Personenkontext::new(self.person_id, self.organisation_id, self.role_id)
    }
}
