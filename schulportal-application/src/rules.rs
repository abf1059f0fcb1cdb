//! Personenkontext 用例规则集
//!
//! 为“创建单条”与“整体更新一个人的 Personenkontext”两个用例各装配一个规约聚合器，
//! 两者都以批次为评估对象：创建是在既有 Personenkontext 上追加一条，
//! 整体更新的批次即是更新后的完整状态。评估顺序固定：
//! - 整体更新：角色类别一致 → 班级映射学校 → 逐条相容性 → 学习者需要班级；
//! - 创建单条：班级映射学校 → 相容性 → 角色类别一致 → 学习者需要班级。
//!
//! 创建时班级映射学校排在最前：班级上的校领导角色同时违反多条规则时，
//! 报告的是更具体的 `class-role-mismatch`。
//!
use schulportal_domain::error::DomainResult;
use schulportal_domain::model::{Personenkontext, PersonenkontextBatch};
use schulportal_domain::repository::{
    OrganisationRepository, PersonenkontextRepository, RoleRepository,
};
use schulportal_domain::rules::{
    ClassRoleMirrorsSchool, ForEachKontext, LearnerRequiresClass, RoleFitsOrganisationType,
    UniformRoleKind,
};
use schulportal_domain::specification::SpecificationAggregator;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// 规则违规标签
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleViolation {
    RoleOrganizationIncompatible,
    ClassRoleMismatch,
    MixedRoleKinds,
    LearnerWithoutClass,
}

impl RuleViolation {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::RoleOrganizationIncompatible => "role-organization-incompatible",
            Self::ClassRoleMismatch => "class-role-mismatch",
            Self::MixedRoleKinds => "mixed-role-kinds",
            Self::LearnerWithoutClass => "learner-without-class",
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 两个用例的规约聚合器
pub struct PersonenkontextRules {
    create: SpecificationAggregator<PersonenkontextBatch, RuleViolation>,
    update: SpecificationAggregator<PersonenkontextBatch, RuleViolation>,
}

impl PersonenkontextRules {
    pub fn new(
        organisations: Arc<dyn OrganisationRepository>,
        roles: Arc<dyn RoleRepository>,
        kontexte: Arc<dyn PersonenkontextRepository>,
    ) -> Self {
        let create = SpecificationAggregator::<PersonenkontextBatch, _>::new()
            .rule(
                "class-mirrors-school",
                ClassRoleMirrorsSchool::new(organisations.clone(), kontexte.clone()),
                RuleViolation::ClassRoleMismatch,
            )
            .rule(
                "role-fits-organisation",
                ForEachKontext::new(RoleFitsOrganisationType::new(
                    organisations.clone(),
                    roles.clone(),
                )),
                RuleViolation::RoleOrganizationIncompatible,
            )
            .rule(
                "uniform-role-kind",
                UniformRoleKind::new(roles.clone(), kontexte.clone()),
                RuleViolation::MixedRoleKinds,
            )
            .rule(
                "learner-requires-class",
                LearnerRequiresClass::new(organisations.clone(), roles.clone(), kontexte.clone()),
                RuleViolation::LearnerWithoutClass,
            );

        let update = SpecificationAggregator::<PersonenkontextBatch, _>::new()
            .rule(
                "uniform-role-kind",
                UniformRoleKind::new(roles.clone(), kontexte.clone()),
                RuleViolation::MixedRoleKinds,
            )
            .rule(
                "class-mirrors-school",
                ClassRoleMirrorsSchool::new(organisations.clone(), kontexte.clone()),
                RuleViolation::ClassRoleMismatch,
            )
            .rule(
                "role-fits-organisation",
                ForEachKontext::new(RoleFitsOrganisationType::new(
                    organisations.clone(),
                    roles.clone(),
                )),
                RuleViolation::RoleOrganizationIncompatible,
            )
            .rule(
                "learner-requires-class",
                LearnerRequiresClass::new(organisations, roles, kontexte),
                RuleViolation::LearnerWithoutClass,
            );

        Self { create, update }
    }

    /// 评估单条创建，对照该人既有的 Personenkontext
    pub async fn check_create(
        &self,
        candidate: &Personenkontext,
    ) -> DomainResult<Option<RuleViolation>> {
        self.create
            .evaluate(&PersonenkontextBatch::single(*candidate))
            .await
    }

    /// 评估一个人的整体更新，批次应为更新后的完整状态
    pub async fn check_update(
        &self,
        batch: &PersonenkontextBatch,
    ) -> DomainResult<Option<RuleViolation>> {
        self.update.evaluate(batch).await
    }

    pub fn create_rule_names(&self) -> Vec<&'static str> {
        self.create.rule_names()
    }

    pub fn update_rule_names(&self) -> Vec<&'static str> {
        self.update.rule_names()
    }
}
