//! 完成触发器
//!
//! 每次账本写入后同步调用。已分配医生全部锁定评审时运行分析并给出最终结论，
//! 每个重置周期最多执行一次（以分析结果是否存在为准）。

use review_core::{AiResult, FinalResult, Review};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::ledger::ReviewLedger;

/// 分析提供者
pub trait AnalysisProvider: fmt::Debug + Send + Sync {
    /// 提供者名称，用于日志
    fn name(&self) -> &str;

    /// 对已锁定的评审执行分析
    fn analyze(&self, scan_id: &str, reviews: &[Review]) -> AiResult;

    /// 由分析结果得出最终结论
    fn verdict(&self, _ai_result: &AiResult, _reviews: &[Review]) -> FinalResult {
        FinalResult::Match
    }
}

/// 固定输出的桩分析
#[derive(Debug, Clone, Default)]
pub struct StubAnalysis;

impl StubAnalysis {
    pub fn result() -> AiResult {
        AiResult {
            condition: "Acne Vulgaris".to_string(),
            confidence: "High".to_string(),
            notes: "Detected multiple inflammatory lesions and comedones. Pattern consistent with moderate acne vulgaris."
                .to_string(),
        }
    }
}

impl AnalysisProvider for StubAnalysis {
    fn name(&self) -> &str {
        "stub"
    }

    fn analyze(&self, _scan_id: &str, _reviews: &[Review]) -> AiResult {
        Self::result()
    }
}

/// 触发器产出的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub ai_result: AiResult,
    pub final_result: FinalResult,
}

/// 完成检查快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionCheck {
    pub locked: usize,
    pub assigned: usize,
}

impl CompletionCheck {
    pub fn is_complete(&self) -> bool {
        self.assigned > 0 && self.locked == self.assigned
    }
}

/// 完成触发器
#[derive(Debug)]
pub struct CompletionTrigger {
    provider: Box<dyn AnalysisProvider>,
}

impl CompletionTrigger {
    pub fn new(provider: Box<dyn AnalysisProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// 计算 L / A
    pub fn check(ledger: &ReviewLedger, assigned: &[String]) -> CompletionCheck {
        CompletionCheck {
            locked: ledger.locked_count(assigned),
            assigned: assigned.len(),
        }
    }

    /// 评估是否需要运行分析
    ///
    /// `already_ran` 为真时永不再次产出结果。
    pub fn evaluate(
        &self,
        scan_id: &str,
        ledger: &ReviewLedger,
        assigned: &[String],
        already_ran: bool,
    ) -> Option<PipelineOutcome> {
        let check = Self::check(ledger, assigned);
        debug!(
            "Completion check for {}: {}/{} locked (already ran: {})",
            scan_id, check.locked, check.assigned, already_ran
        );

        if already_ran || !check.is_complete() {
            return None;
        }

        let reviews = ledger.assigned_reviews(assigned);
        let ai_result = self.provider.analyze(scan_id, &reviews);
        let final_result = self.provider.verdict(&ai_result, &reviews);

        info!(
            "Analysis '{}' executed for {}: {} ({}), final result {}",
            self.provider.name(),
            scan_id,
            ai_result.condition,
            ai_result.confidence,
            final_result
        );

        Some(PipelineOutcome { ai_result, final_result })
    }
}

impl Default for CompletionTrigger {
    fn default() -> Self {
        Self::new(Box::new(StubAnalysis))
    }
}
