//! 管理端视图模型
//!
//! 扫描进度与最终汇总，均从存储只读计算

use std::collections::BTreeSet;
use std::fmt;

use review_core::{AiResult, FinalResult, Review};
use review_workflow::ReviewStore;
use serde::{Deserialize, Serialize};

/// 扫描进度阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressStage {
    WaitingForDoctors,
    AllReviewsSubmitted,
    AiCompleted,
    Finalized,
}

impl ProgressStage {
    pub fn label(&self) -> &'static str {
        match self {
            ProgressStage::WaitingForDoctors => "Waiting for doctors",
            ProgressStage::AllReviewsSubmitted => "All reviews submitted",
            ProgressStage::AiCompleted => "AI completed",
            ProgressStage::Finalized => "Finalized",
        }
    }

    /// 管理员下一步操作提示
    pub fn next_step(&self) -> &'static str {
        match self {
            ProgressStage::WaitingForDoctors => "Lock remaining reviews",
            ProgressStage::AllReviewsSubmitted => "Run AI (auto when all locked)",
            ProgressStage::AiCompleted => "Review AI + Finalize",
            ProgressStage::Finalized => "Review Final Report",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 扫描进度
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub scan_id: String,
    pub locked_count: usize,
    pub assigned_count: usize,
    pub slots_remaining: usize,
    pub assignment_locked: bool,
    pub stage: ProgressStage,
    pub next_step: String,
}

impl ScanProgress {
    pub fn from_store(store: &ReviewStore) -> Self {
        let check = store.completion_check();

        let stage = if store.final_result().is_some() {
            ProgressStage::Finalized
        } else if store.ai_result().is_some() {
            ProgressStage::AiCompleted
        } else if check.is_complete() {
            ProgressStage::AllReviewsSubmitted
        } else {
            ProgressStage::WaitingForDoctors
        };

        Self {
            scan_id: store.scan_id().to_string(),
            locked_count: check.locked,
            assigned_count: check.assigned,
            slots_remaining: store.slots_remaining(),
            assignment_locked: store.assignment_locked(),
            stage,
            next_step: stage.next_step().to_string(),
        }
    }
}

/// 医生间一致性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Agreement {
    /// 仍有已分配医生未填写诊断
    Pending,
    Unanimous,
    Partial,
    None,
}

impl Agreement {
    /// 由已分配评审计算一致性
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() || reviews.iter().any(|r| r.condition.is_empty()) {
            return Agreement::Pending;
        }

        let distinct: BTreeSet<&str> = reviews.iter().map(|r| r.condition.as_str()).collect();
        match distinct.len() {
            1 => Agreement::Unanimous,
            2 => Agreement::Partial,
            _ => Agreement::None,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Agreement::Pending => "Pending doctor submissions.",
            Agreement::Unanimous => "All doctors independently identified the same condition.",
            Agreement::Partial => "Partial agreement among doctors.",
            Agreement::None => "No agreement between doctors.",
        }
    }
}

/// 最终汇总（只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSummary {
    pub scan_id: String,
    /// 已分配医生的评审，按医生列表顺序
    pub reviews: Vec<Review>,
    pub agreement: Agreement,
    pub locked_count: usize,
    pub ai_result: Option<AiResult>,
    pub final_result: Option<FinalResult>,
}

impl FinalSummary {
    pub fn from_store(store: &ReviewStore) -> Self {
        let reviews: Vec<Review> = store
            .assigned_doctors()
            .iter()
            .map(|doctor| store.review(&doctor.id))
            .collect();
        let locked_count = reviews.iter().filter(|r| r.is_locked()).count();

        Self {
            scan_id: store.scan_id().to_string(),
            agreement: Agreement::from_reviews(&reviews),
            locked_count,
            reviews,
            ai_result: store.ai_result().cloned(),
            final_result: store.final_result(),
        }
    }
}
