use crate::rules::RuleViolation;
use schulportal_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// 领域层错误；其中 `Lookup` 为依赖解析失败，需与规则违规分开处理
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("rule violation: {0}")]
    RuleViolation(RuleViolation),

    #[error("persistence: {0}")]
    Persistence(String),

    #[error("config: key={key}, reason={reason}")]
    Config { key: &'static str, reason: String },
}

impl AppError {
    pub fn violation(&self) -> Option<RuleViolation> {
        match self {
            Self::RuleViolation(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_lookup_failure())
    }
}

pub type AppResult<T> = Result<T, AppError>;
