//! 核心数据模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, ReviewError};

/// 评审者可选的置信度
pub const CONFIDENCE_LEVELS: [&str; 3] = ["Low", "Medium", "High"];

/// 医生账号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    // 演示系统使用明文密码，不随导出输出
    #[serde(default, skip_serializing)]
    pub password: String,
}

/// 新增医生请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// 扫描与医生的分配关系
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub scan_id: String,
    pub doctor_ids: Vec<String>, // 按分配顺序保存，语义上是集合
}

/// 评审状态
///
/// 顺序即生命周期顺序：`NotStarted < Draft < Locked`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReviewStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    Draft,
    Locked,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::NotStarted => write!(f, "Not Started"),
            ReviewStatus::Draft => write!(f, "Draft"),
            ReviewStatus::Locked => write!(f, "Locked"),
        }
    }
}

/// 评审表单字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFields {
    pub condition: String,
    pub confidence: String,
    pub notes: String,
}

impl ReviewFields {
    pub fn new(condition: impl Into<String>, confidence: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            confidence: confidence.into(),
            notes: notes.into(),
        }
    }

    /// 提交前的必填校验
    ///
    /// 账本本身不调用此方法，由调用方在提交前自行校验。
    pub fn validate_for_submit(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.condition.trim().is_empty() {
            problems.push("Condition is required".to_string());
        }

        let confidence = self.confidence.trim();
        if confidence.is_empty() {
            problems.push("Confidence is required".to_string());
        } else if !CONFIDENCE_LEVELS.contains(&confidence) {
            problems.push(format!("Unknown confidence level: {}", confidence));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ReviewError::Validation(problems.join("; ")))
        }
    }
}

/// 单个医生对扫描的评审记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub doctor_id: String,
    pub condition: String,
    pub confidence: String,
    pub notes: String,
    pub status: ReviewStatus,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Review {
    /// 未开始的空白评审
    pub fn blank(doctor_id: impl Into<String>) -> Self {
        Self {
            doctor_id: doctor_id.into(),
            condition: String::new(),
            confidence: String::new(),
            notes: String::new(),
            status: ReviewStatus::NotStarted,
            updated_at: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.status == ReviewStatus::Locked
    }
}

/// AI 分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResult {
    pub condition: String,
    pub confidence: String,
    pub notes: String,
}

/// 最终比对结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalResult {
    Match,
    Mismatch,
}

impl fmt::Display for FinalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalResult::Match => write!(f, "Match"),
            FinalResult::Mismatch => write!(f, "Mismatch"),
        }
    }
}

/// 审计日志中的操作者
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Actor {
    System,
    Doctor(String),
    Ai,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::System => write!(f, "System"),
            Actor::Doctor(id) => write!(f, "Doctor {}", id),
            Actor::Ai => write!(f, "AI"),
        }
    }
}

impl From<Actor> for String {
    fn from(actor: Actor) -> Self {
        actor.to_string()
    }
}

impl TryFrom<String> for Actor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "System" => Ok(Actor::System),
            "AI" => Ok(Actor::Ai),
            other => other
                .strip_prefix("Doctor ")
                .filter(|id| !id.is_empty())
                .map(|id| Actor::Doctor(id.to_string()))
                .ok_or_else(|| format!("unknown actor: {}", other)),
        }
    }
}

/// 审计动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Scan Ingested")]
    ScanIngested,
    #[serde(rename = "Scan Assigned")]
    ScanAssigned,
    #[serde(rename = "Draft Saved")]
    DraftSaved,
    #[serde(rename = "Review Submitted")]
    ReviewSubmitted,
    #[serde(rename = "AI Executed")]
    AiExecuted,
    #[serde(rename = "Final Result Locked")]
    FinalResultLocked,
    #[serde(rename = "Doctor Added")]
    DoctorAdded,
    #[serde(rename = "Mock Data Reset")]
    MockDataReset,
}

impl AuditAction {
    pub const ALL: [AuditAction; 8] = [
        AuditAction::ScanIngested,
        AuditAction::ScanAssigned,
        AuditAction::DraftSaved,
        AuditAction::ReviewSubmitted,
        AuditAction::AiExecuted,
        AuditAction::FinalResultLocked,
        AuditAction::DoctorAdded,
        AuditAction::MockDataReset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ScanIngested => "Scan Ingested",
            AuditAction::ScanAssigned => "Scan Assigned",
            AuditAction::DraftSaved => "Draft Saved",
            AuditAction::ReviewSubmitted => "Review Submitted",
            AuditAction::AiExecuted => "AI Executed",
            AuditAction::FinalResultLocked => "Final Result Locked",
            AuditAction::DoctorAdded => "Doctor Added",
            AuditAction::MockDataReset => "Mock Data Reset",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self> {
        AuditAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReviewError::Validation(format!("Unknown audit action: {}", s)))
    }
}

/// 审计日志条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// 追加序号，随调用顺序单调递增
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub actor: Actor,
    pub action: AuditAction,
    pub scan_id: String,
}
