//! 评审账本
//!
//! 每名医生一份评审记录，状态只通过状态机向前推进

use chrono::{DateTime, Utc};
use review_core::{Result, Review, ReviewError, ReviewFields, ReviewStatus};
use tracing::info;

use crate::state_machine::{ReviewEvent, ReviewStateMachine};

/// 评审账本
#[derive(Debug, Clone)]
pub struct ReviewLedger {
    reviews: Vec<Review>,
    state_machine: ReviewStateMachine,
}

impl ReviewLedger {
    /// 为每名医生创建未开始的评审
    pub fn new<I>(doctor_ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut ledger = Self {
            reviews: Vec::new(),
            state_machine: ReviewStateMachine::new(),
        };
        for id in doctor_ids {
            ledger.open(&id);
        }
        ledger
    }

    /// 为新医生登记空白评审，已存在时不变
    pub fn open(&mut self, doctor_id: &str) {
        if self.get(doctor_id).is_none() {
            self.reviews.push(Review::blank(doctor_id));
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn get(&self, doctor_id: &str) -> Option<&Review> {
        self.reviews.iter().find(|r| r.doctor_id == doctor_id)
    }

    /// 获取评审，不存在时返回空白评审
    pub fn review_or_blank(&self, doctor_id: &str) -> Review {
        self.get(doctor_id)
            .cloned()
            .unwrap_or_else(|| Review::blank(doctor_id))
    }

    /// 应用一次账本写入
    ///
    /// 字段整体替换；不做必填校验。非法转换不会修改任何数据。
    pub fn apply(
        &mut self,
        doctor_id: &str,
        event: ReviewEvent,
        fields: ReviewFields,
        at: DateTime<Utc>,
    ) -> Result<&Review> {
        let review = self
            .reviews
            .iter_mut()
            .find(|r| r.doctor_id == doctor_id)
            .ok_or_else(|| ReviewError::DoctorNotFound(doctor_id.to_string()))?;

        let next = self.state_machine.transition(review.status, event)?;
        let previous = review.status;

        review.condition = fields.condition;
        review.confidence = fields.confidence;
        review.notes = fields.notes;
        review.status = next;
        review.updated_at = Some(at);

        info!("Review of doctor {} moved from {:?} to {:?}", doctor_id, previous, next);
        Ok(review)
    }

    /// 已分配医生中已锁定的评审数
    pub fn locked_count(&self, assigned: &[String]) -> usize {
        self.reviews
            .iter()
            .filter(|r| r.is_locked() && assigned.contains(&r.doctor_id))
            .count()
    }

    /// 已分配医生中是否有评审已开始
    pub fn any_started(&self, assigned: &[String]) -> bool {
        self.reviews
            .iter()
            .any(|r| r.status != ReviewStatus::NotStarted && assigned.contains(&r.doctor_id))
    }

    /// 按分配顺序取出已分配医生的评审
    pub fn assigned_reviews(&self, assigned: &[String]) -> Vec<Review> {
        assigned.iter().map(|id| self.review_or_blank(id)).collect()
    }
}
