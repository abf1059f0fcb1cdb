//! 规约（Specification）
//!
//! 规约把一条业务规则封装为可复用、可组合、可测试的异步谓词：
//! - `is_satisfied_by` 可以挂起（执行只读查询），但不得修改候选对象或任何存储；
//! - 组合子 AND / OR / NOT / AND-NOT / OR-NOT 将规约包装为同形的新规约；
//! - 依赖查询失败时返回 `Err`，并沿组合树向上传播（fail-closed），
//!   未解析的依赖永远不会被视为“规则满足”。
//!
//! `SpecificationAggregator` 按顺序评估多条命名规约，并把首个失败映射为违规标签。
//!
mod aggregator;

pub use aggregator::SpecificationAggregator;

use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 规约模式的核心 trait
#[async_trait]
pub trait Specification<T>: Send + Sync
where
    T: Sync,
{
    /// 检查候选对象是否满足规约
    async fn is_satisfied_by(&self, candidate: &T) -> DomainResult<bool>;

    /// AND 组合：左侧不满足时短路，右侧不会被评估
    fn and<S>(self, other: S) -> AndSpecification<T>
    where
        Self: Sized + 'static,
        S: Specification<T> + 'static,
    {
        AndSpecification::new(Box::new(self), Box::new(other))
    }

    /// OR 组合：左侧满足时短路
    fn or<S>(self, other: S) -> OrSpecification<T>
    where
        Self: Sized + 'static,
        S: Specification<T> + 'static,
    {
        OrSpecification::new(Box::new(self), Box::new(other))
    }

    /// 取反
    fn not(self) -> NotSpecification<T>
    where
        Self: Sized + 'static,
    {
        NotSpecification::new(Box::new(self))
    }

    /// `self AND (NOT other)`：规则成立，除非例外条件成立
    fn and_not<S>(self, other: S) -> AndNotSpecification<T>
    where
        Self: Sized + 'static,
        S: Specification<T> + 'static,
    {
        AndNotSpecification::new(Box::new(self), Box::new(other))
    }

    /// `self OR (NOT other)`
    fn or_not<S>(self, other: S) -> OrNotSpecification<T>
    where
        Self: Sized + 'static,
        S: Specification<T> + 'static,
    {
        OrNotSpecification::new(Box::new(self), Box::new(other))
    }
}

/// 为 Box<dyn Specification<T>> 实现 Specification，使装箱规约可以继续组合
#[async_trait]
impl<T> Specification<T> for Box<dyn Specification<T>>
where
    T: Sync,
{
    async fn is_satisfied_by(&self, candidate: &T) -> DomainResult<bool> {
        self.as_ref().is_satisfied_by(candidate).await
    }
}

/// 共享规约：同一个实例可被多个聚合器或组合树引用
#[async_trait]
impl<T, S> Specification<T> for Arc<S>
where
    T: Sync,
    S: Specification<T> + ?Sized,
{
    async fn is_satisfied_by(&self, candidate: &T) -> DomainResult<bool> {
        self.as_ref().is_satisfied_by(candidate).await
    }
}

/// AND 组合规约
pub struct AndSpecification<T>
where
    T: Sync,
{
    left: Box<dyn Specification<T>>,
    right: Box<dyn Specification<T>>,
}

impl<T> AndSpecification<T>
where
    T: Sync,
{
    pub fn new(left: Box<dyn Specification<T>>, right: Box<dyn Specification<T>>) -> Self {
        Self { left, right }
    }
}

#[async_trait]
impl<T> Specification<T> for AndSpecification<T>
where
    T: Sync,
{
    async fn is_satisfied_by(&self, candidate: &T) -> DomainResult<bool> {
        Ok(self.left.is_satisfied_by(candidate).await?
            && self.right.is_satisfied_by(candidate).await?)
    }
}

/// OR 组合规约
pub struct OrSpecification<T>
where
    T: Sync,
{
    left: Box<dyn Specification<T>>,
    right: Box<dyn Specification<T>>,
}

impl<T> OrSpecification<T>
where
    T: Sync,
{
    pub fn new(left: Box<dyn Specification<T>>, right: Box<dyn Specification<T>>) -> Self {
        Self { left, right }
    }
}

#[async_trait]
impl<T> Specification<T> for OrSpecification<T>
where
    T: Sync,
{
    async fn is_satisfied_by(&self, candidate: &T) -> DomainResult<bool> {
        Ok(self.left.is_satisfied_by(candidate).await?
            || self.right.is_satisfied_by(candidate).await?)
    }
}

/// NOT 规约
pub struct NotSpecification<T>
where
    T: Sync,
{
    inner: Box<dyn Specification<T>>,
}

impl<T> NotSpecification<T>
where
    T: Sync,
{
    pub fn new(inner: Box<dyn Specification<T>>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T> Specification<T> for NotSpecification<T>
where
    T: Sync,
{
    async fn is_satisfied_by(&self, candidate: &T) -> DomainResult<bool> {
        Ok(!self.inner.is_satisfied_by(candidate).await?)
    }
}

/// AND-NOT 规约：`left AND (NOT right)`
pub struct AndNotSpecification<T>
where
    T: Sync,
{
    left: Box<dyn Specification<T>>,
    right: Box<dyn Specification<T>>,
}

impl<T> AndNotSpecification<T>
where
    T: Sync,
{
    pub fn new(left: Box<dyn Specification<T>>, right: Box<dyn Specification<T>>) -> Self {
        Self { left, right }
    }
}

#[async_trait]
impl<T> Specification<T> for AndNotSpecification<T>
where
    T: Sync,
{
    async fn is_satisfied_by(&self, candidate: &T) -> DomainResult<bool> {
        Ok(self.left.is_satisfied_by(candidate).await?
            && !self.right.is_satisfied_by(candidate).await?)
    }
}

/// OR-NOT 规约：`left OR (NOT right)`
pub struct OrNotSpecification<T>
where
    T: Sync,
{
    left: Box<dyn Specification<T>>,
    right: Box<dyn Specification<T>>,
}

impl<T> OrNotSpecification<T>
where
    T: Sync,
{
    pub fn new(left: Box<dyn Specification<T>>, right: Box<dyn Specification<T>>) -> Self {
        Self { left, right }
    }
}

#[async_trait]
impl<T> Specification<T> for OrNotSpecification<T>
where
    T: Sync,
{
    async fn is_satisfied_by(&self, candidate: &T) -> DomainResult<bool> {
        Ok(self.left.is_satisfied_by(candidate).await?
            || !self.right.is_satisfied_by(candidate).await?)
    }
}
