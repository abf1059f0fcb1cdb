//! 领域层统一错误定义
//!
//! 区分两类失败：
//! - 依赖解析失败（`Lookup`）：规约所依赖的查询无法完成，必须让整个评估失败；
//! - 取值非法（`InvalidValue`）：标识符解析失败或批次中混入了其他人的条目。
//!
//! 业务规则不满足不是错误，由聚合器以违规标签返回；
//! 事件处理器的失败由总线记录在发布报告里，不经过此类型。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 依赖解析 ---
    #[error("lookup failed: resource={resource}, reason={reason}")]
    Lookup {
        resource: &'static str,
        reason: String,
    },

    // --- 校验 ---
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
}

impl DomainError {
    pub fn lookup(resource: &'static str, reason: impl Into<String>) -> Self {
        Self::Lookup {
            resource,
            reason: reason.into(),
        }
    }

    /// 是否为依赖解析失败（调用方需与规则违规分开处理）
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::Lookup { .. })
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::InvalidValue {
            reason: err.to_string(),
        }
    }
}
