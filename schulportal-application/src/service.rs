//! Personenkontext 用例服务
//!
//! 固定流程：评估规则 → 通过写入端口持久化 → 发布事件。
//! 规则违规或依赖解析失败时不会发生任何写入；每条变更在写入成功后立即发布，
//! 中途写入失败时已提交的变更仍有对应事件。下游处理器的结果不会影响本次调用。
//!
use crate::error::{AppError, AppResult};
use crate::rules::{PersonenkontextRules, RuleViolation};
use schulportal_domain::error::DomainError;
use schulportal_domain::event::{
    PersonDeletedEvent, PersonenkontextCreatedEvent, PersonenkontextDeletedEvent,
    PersonenkontexteUpdatedEvent,
};
use schulportal_domain::eventing::EventBus;
use schulportal_domain::model::{PersonId, Personenkontext, PersonenkontextBatch};
use schulportal_domain::repository::{PersonenkontextRepository, PersonenkontextWriter};
use std::sync::Arc;

fn persistence(err: DomainError) -> AppError {
    AppError::Persistence(err.to_string())
}

pub struct PersonenkontextService {
    rules: PersonenkontextRules,
    kontexte: Arc<dyn PersonenkontextRepository>,
    writer: Arc<dyn PersonenkontextWriter>,
    bus: Arc<EventBus>,
}

impl PersonenkontextService {
    pub fn new(
        rules: PersonenkontextRules,
        kontexte: Arc<dyn PersonenkontextRepository>,
        writer: Arc<dyn PersonenkontextWriter>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            rules,
            kontexte,
            writer,
            bus,
        }
    }

    fn reject(person_id: PersonId, violation: RuleViolation) -> AppError {
        tracing::info!(person = %person_id, rule = %violation, "personenkontext change rejected");
        AppError::RuleViolation(violation)
    }

    /// 创建一条 Personenkontext；已存在时直接返回，不重复发布事件
    pub async fn create(&self, candidate: Personenkontext) -> AppResult<Personenkontext> {
        if let Some(violation) = self.rules.check_create(&candidate).await? {
            return Err(Self::reject(candidate.person_id, violation));
        }

        let existing = self
            .kontexte
            .find_kontexte_by_person(&candidate.person_id)
            .await?;
        if existing.contains(&candidate) {
            return Ok(candidate);
        }

        self.writer.save(&candidate).await.map_err(persistence)?;
        let _ = self.bus.publish(PersonenkontextCreatedEvent::from(candidate));
        Ok(candidate)
    }

    /// 用 `desired` 整体替换一个人的 Personenkontext
    ///
    /// `desired` 即更新后的完整状态，规则只对照它评估。先删除不再需要的条目，
    /// 再写入新增条目，每条写入成功后立即发布对应事件，汇总事件最后发布。
    pub async fn update(
        &self,
        person_id: PersonId,
        desired: Vec<Personenkontext>,
    ) -> AppResult<PersonenkontexteUpdatedEvent> {
        let batch = PersonenkontextBatch::complete(person_id, desired)?;
        if let Some(violation) = self.rules.check_update(&batch).await? {
            return Err(Self::reject(person_id, violation));
        }

        let existing = self.kontexte.find_kontexte_by_person(&person_id).await?;
        let mut current: Vec<Personenkontext> = Vec::with_capacity(batch.len());
        for k in &batch {
            if !current.contains(k) {
                current.push(*k);
            }
        }
        let created: Vec<Personenkontext> = current
            .iter()
            .filter(|k| !existing.contains(k))
            .copied()
            .collect();
        let deleted: Vec<Personenkontext> = existing
            .iter()
            .filter(|k| !current.contains(k))
            .copied()
            .collect();

        for k in &deleted {
            self.writer.delete(k).await.map_err(persistence)?;
            let _ = self.bus.publish(PersonenkontextDeletedEvent::from(*k));
        }
        for k in &created {
            self.writer.save(k).await.map_err(persistence)?;
            let _ = self.bus.publish(PersonenkontextCreatedEvent::from(*k));
        }

        let summary = PersonenkontexteUpdatedEvent {
            person_id,
            created,
            deleted,
            current,
        };
        tracing::debug!(
            person = %person_id,
            created = summary.created.len(),
            deleted = summary.deleted.len(),
            "personenkontexte updated"
        );
        let _ = self.bus.publish(summary.clone());
        Ok(summary)
    }

    /// 删除一条 Personenkontext；不存在时返回 `false` 且不发布事件
    pub async fn delete(&self, kontext: Personenkontext) -> AppResult<bool> {
        let removed = self.writer.delete(&kontext).await.map_err(persistence)?;
        if removed {
            let _ = self.bus.publish(PersonenkontextDeletedEvent::from(kontext));
        }
        Ok(removed)
    }

    /// 删除一个人的全部 Personenkontext，并发布人员已删除事件；返回删除的条目数
    pub async fn delete_person(
        &self,
        person_id: PersonId,
        username: Option<String>,
    ) -> AppResult<usize> {
        let existing = self.kontexte.find_kontexte_by_person(&person_id).await?;
        for k in &existing {
            self.writer.delete(k).await.map_err(persistence)?;
            let _ = self.bus.publish(PersonenkontextDeletedEvent::from(*k));
        }
        let _ = self.bus.publish(PersonDeletedEvent {
            person_id,
            username,
        });
        Ok(existing.len())
    }
}
