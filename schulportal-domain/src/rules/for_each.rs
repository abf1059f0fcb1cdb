use crate::error::DomainResult;
use crate::model::{Personenkontext, PersonenkontextBatch};
use crate::specification::Specification;
use async_trait::async_trait;

/// 将单条规约提升到批次：批次中每一条都满足才满足（首个不满足即停止）
pub struct ForEachKontext<S> {
    inner: S,
}

impl<S> ForEachKontext<S>
where
    S: Specification<Personenkontext>,
{
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S> Specification<PersonenkontextBatch> for ForEachKontext<S>
where
    S: Specification<Personenkontext>,
{
    async fn is_satisfied_by(&self, batch: &PersonenkontextBatch) -> DomainResult<bool> {
        for kontext in batch {
            if !self.inner.is_satisfied_by(kontext).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
