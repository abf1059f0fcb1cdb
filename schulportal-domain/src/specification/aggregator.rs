//! 规约聚合器（SpecificationAggregator）
//!
//! 按注册顺序评估一组命名规约，返回首个失败规约对应的违规标签：
//! - 顺序即优先级：应把廉价、基础的规则放在需要深层层级遍历的规则之前；
//! - 首个失败后立即停止，后续规约不会执行查询；
//! - 纯读路径，没有副作用；依赖解析失败以 `Err` 原样返回，不会被映射为违规。
//!
use super::Specification;
use crate::error::DomainResult;

struct NamedRule<T, V>
where
    T: Sync,
{
    name: &'static str,
    spec: Box<dyn Specification<T>>,
    violation: V,
}

/// 有序的命名规约列表
pub struct SpecificationAggregator<T, V>
where
    T: Sync,
{
    rules: Vec<NamedRule<T, V>>,
}

impl<T, V> Default for SpecificationAggregator<T, V>
where
    T: Sync,
{
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T, V> SpecificationAggregator<T, V>
where
    T: Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条规约；评估顺序与追加顺序一致
    pub fn rule<S>(mut self, name: &'static str, spec: S, violation: V) -> Self
    where
        S: Specification<T> + 'static,
    {
        self.rules.push(NamedRule {
            name,
            spec: Box::new(spec),
            violation,
        });
        self
    }

    /// 已注册规约名（按评估顺序）
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// 评估全部规约，返回首个失败对应的违规标签；全部满足时返回 `None`
    pub async fn evaluate(&self, candidate: &T) -> DomainResult<Option<V>> {
        for rule in &self.rules {
            let satisfied = rule
                .spec
                .is_satisfied_by(candidate)
                .await
                .inspect_err(|e| {
                    tracing::warn!(rule = rule.name, error = %e, "rule evaluation aborted")
                })?;

            if !satisfied {
                tracing::debug!(rule = rule.name, "rule not satisfied");
                return Ok(Some(rule.violation.clone()));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Tag {
        TooSmall,
        Odd,
    }

    struct AtLeast(i32);
    #[async_trait]
    impl Specification<i32> for AtLeast {
        async fn is_satisfied_by(&self, candidate: &i32) -> DomainResult<bool> {
            Ok(*candidate >= self.0)
        }
    }

    #[derive(Clone, Default)]
    struct CountingEven {
        calls: Arc<AtomicUsize>,
    }
    #[async_trait]
    impl Specification<i32> for CountingEven {
        async fn is_satisfied_by(&self, candidate: &i32) -> DomainResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(candidate % 2 == 0)
        }
    }

    struct Broken;
    #[async_trait]
    impl Specification<i32> for Broken {
        async fn is_satisfied_by(&self, _: &i32) -> DomainResult<bool> {
            Err(DomainError::lookup("role", "timeout"))
        }
    }

    #[tokio::test]
    async fn returns_first_failing_rule_and_skips_the_rest() {
        let even = CountingEven::default();
        let agg = SpecificationAggregator::new()
            .rule("at-least-10", AtLeast(10), Tag::TooSmall)
            .rule("even", even.clone(), Tag::Odd);

        assert_eq!(agg.evaluate(&3).await.unwrap(), Some(Tag::TooSmall));
        assert_eq!(even.calls.load(Ordering::SeqCst), 0);

        assert_eq!(agg.evaluate(&11).await.unwrap(), Some(Tag::Odd));
        assert_eq!(agg.evaluate(&12).await.unwrap(), None);
        assert_eq!(agg.rule_names(), vec!["at-least-10", "even"]);
    }

    #[tokio::test]
    async fn evaluation_is_deterministic() {
        let agg = SpecificationAggregator::new()
            .rule("even", CountingEven::default(), Tag::Odd)
            .rule("at-least-10", AtLeast(10), Tag::TooSmall);

        for x in [1, 4, 13, 20] {
            let first = agg.evaluate(&x).await.unwrap();
            let second = agg.evaluate(&x).await.unwrap();
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn lookup_failure_is_not_a_violation() {
        let agg = SpecificationAggregator::new()
            .rule("broken", Broken, Tag::Odd)
            .rule("at-least-10", AtLeast(10), Tag::TooSmall);

        let err = agg.evaluate(&1).await.unwrap_err();
        assert!(err.is_lookup_failure());
    }

    #[tokio::test]
    async fn empty_aggregator_passes() {
        let agg: SpecificationAggregator<i32, Tag> = SpecificationAggregator::new();
        assert_eq!(agg.evaluate(&0).await.unwrap(), None);
    }
}
