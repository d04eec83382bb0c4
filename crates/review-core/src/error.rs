//! 错误定义模块

use thiserror::Error;

/// 扫描评审系统统一错误类型
#[derive(Error, Debug)]
pub enum ReviewError {
    /// 凭据错误或医生未分配，两种原因对调用方不做区分
    #[error("认证失败: 凭据无效或未分配")]
    AuthFailure,

    #[error("分配已锁定: 已有评审开始")]
    AssignmentLocked,

    #[error("分配已满: 最多 {max} 名医生")]
    AssignmentFull { max: usize },

    #[error("医生未找到: {0}")]
    DoctorNotFound(String),

    #[error("医生未分配到该扫描: {0}")]
    NotAssigned(String),

    #[error("无效状态转换: 从 {from} 到 {event}")]
    InvalidStateTransition { from: String, event: String },

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReviewError {
    /// 是否属于"操作被拒绝"一类（无副作用的业务拒绝）
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ReviewError::AssignmentLocked
                | ReviewError::AssignmentFull { .. }
                | ReviewError::InvalidStateTransition { .. }
                | ReviewError::NotAssigned(_)
        )
    }
}

/// 扫描评审系统统一结果类型
pub type Result<T> = std::result::Result<T, ReviewError>;
