use super::{OrganisationType, RoleId};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 角色类别：决定可挂载的组织类型以及可共存的其他角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleKind {
    Learner,
    Teacher,
    Leader,
    SysAdmin,
    External,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learner => "LEARNER",
            Self::Teacher => "TEACHER",
            Self::Leader => "LEADER",
            Self::SysAdmin => "SYSADMIN",
            Self::External => "EXTERNAL",
        }
    }

    /// 该类别角色可挂载的组织类型（固定映射，未列出的组合一律拒绝）
    pub fn permitted_organisation_types(&self) -> &'static [OrganisationType] {
        use OrganisationType::*;
        match self {
            Self::SysAdmin => &[Root, Region],
            Self::Leader => &[School],
            Self::External => &[School],
            Self::Teacher | Self::Learner => &[School, Class],
        }
    }

    pub fn permits(&self, organisation_type: OrganisationType) -> bool {
        self.permitted_organisation_types()
            .contains(&organisation_type)
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 角色
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    #[builder(into)]
    name: String,
    kind: RoleKind,
}

impl Role {
    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RoleKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_map() {
        assert!(RoleKind::SysAdmin.permits(OrganisationType::Root));
        assert!(RoleKind::SysAdmin.permits(OrganisationType::Region));
        assert!(!RoleKind::SysAdmin.permits(OrganisationType::School));

        assert!(RoleKind::Leader.permits(OrganisationType::School));
        assert!(!RoleKind::Leader.permits(OrganisationType::Class));

        assert!(RoleKind::Teacher.permits(OrganisationType::Class));
        assert!(RoleKind::Learner.permits(OrganisationType::School));
        assert!(!RoleKind::Learner.permits(OrganisationType::Root));

        assert!(!RoleKind::External.permits(OrganisationType::Carrier));
    }
}
