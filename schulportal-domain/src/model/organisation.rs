use super::OrganisationId;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 组织单元在层级中的结构类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganisationType {
    /// 层级根
    Root,
    /// 州/区域
    Region,
    /// 学校承办方（Träger）
    Carrier,
    /// 学校
    School,
    /// 班级：由学校管理的叶子单元
    Class,
    /// 其他
    Other,
}

impl OrganisationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "ROOT",
            Self::Region => "REGION",
            Self::Carrier => "CARRIER",
            Self::School => "SCHOOL",
            Self::Class => "CLASS",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for OrganisationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 组织单元
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    id: OrganisationId,
    #[builder(into)]
    name: String,
    kind: OrganisationType,
    /// 管理该单元的上级（班级指向其所属学校）
    administered_by: Option<OrganisationId>,
}

impl Organisation {
    pub fn id(&self) -> OrganisationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OrganisationType {
        self.kind
    }

    pub fn administered_by(&self) -> Option<OrganisationId> {
        self.administered_by
    }

    pub fn is_class(&self) -> bool {
        self.kind == OrganisationType::Class
    }
}
