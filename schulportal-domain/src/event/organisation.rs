use crate::model::{OrganisationId, OrganisationType};
use schulportal_macros::domain_event;

/// 组织单元已删除
#[domain_event(name = "organisation.deleted")]
pub struct OrganisationDeletedEvent {
    pub organisation_id: OrganisationId,
    pub kind: OrganisationType,
}
