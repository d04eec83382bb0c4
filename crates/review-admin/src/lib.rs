//! # 扫描评审管理模块
//!
//! 提供配置管理、扫描进度与最终汇总等管理端功能

pub mod config;
pub mod dashboard;

use anyhow::{Context, Result};
use review_workflow::{AuditStats, ReviewStore};

pub use self::config::{ConfigManager, ReviewConfig};
pub use self::dashboard::{Agreement, FinalSummary, ProgressStage, ScanProgress};

/// 根据配置创建评审存储
pub fn build_store(config: &ReviewConfig) -> Result<ReviewStore> {
    let seed = config
        .seed_data()
        .context("Failed to build seed data from configuration")?;
    Ok(ReviewStore::with_seed(seed))
}

/// 扫描状态报告
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReviewReport {
    /// 报告生成时间
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// 扫描进度
    pub progress: ScanProgress,
    /// 最终汇总
    pub summary: FinalSummary,
    /// 审计统计
    pub audit_stats: AuditStats,
}

impl ReviewReport {
    /// 生成当前状态报告
    pub fn generate(store: &ReviewStore) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            progress: ScanProgress::from_store(store),
            summary: FinalSummary::from_store(store),
            audit_stats: store.audit_log().stats(),
        }
    }
}
