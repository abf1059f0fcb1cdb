use crate::model::PersonId;
use schulportal_macros::domain_event;

/// 人员已删除；下游需清理目录条目、邮箱与各系统账号
#[domain_event(name = "person.deleted")]
pub struct PersonDeletedEvent {
    pub person_id: PersonId,
    pub username: Option<String>,
}
