//! 领域模型
//!
//! 规约评估所需的最小模型：
//! - `Role` / `RoleKind`：角色及其类别（学习者、教师、校领导、系统管理员、外部人员）；
//! - `Organisation` / `OrganisationType`：组织单元及其在层级中的结构类型；
//! - `Personenkontext`：一个人在一个组织单元上被赋予一个角色；
//! - `PersonenkontextBatch`：同一人一次请求中待创建/更新的一组 Personenkontext。

mod ids;
mod organisation;
mod personenkontext;
mod role;

pub use ids::{OrganisationId, PersonId, RoleId};
pub use organisation::{Organisation, OrganisationType};
pub use personenkontext::{BatchScope, Personenkontext, PersonenkontextBatch};
pub use role::{Role, RoleKind};
