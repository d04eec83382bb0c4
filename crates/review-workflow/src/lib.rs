//! # 扫描评审工作流模块
//!
//! 提供单个扫描的盲评工作流管理功能，包括：
//! - 评审状态机：管理评审的生命周期（未开始 → 草稿 → 锁定）
//! - 身份认证：管理员与已分配医生的登录校验
//! - 分配登记：医生与扫描的绑定，评审开始后冻结
//! - 评审账本与完成触发器：全部评审锁定后自动运行分析并锁定最终结果
//! - 审计日志：只追加的事件记录，支持过滤与导出

pub mod assignment;
pub mod audit;
pub mod engine;
pub mod identity;
pub mod ledger;
pub mod pipeline;
pub mod seed;
pub mod session;
pub mod state_machine;

// 重新导出主要类型
pub use assignment::AssignmentRegistry;
pub use audit::{ActorPreset, AuditLog, AuditQuery, AuditStats, ExportFormat};
pub use engine::ReviewStore;
pub use identity::{AdminAccount, AuthOutcome, IdentityStore};
pub use ledger::ReviewLedger;
pub use pipeline::{AnalysisProvider, CompletionCheck, CompletionTrigger, PipelineOutcome, StubAnalysis};
pub use seed::SeedData;
pub use session::{SessionHints, SessionState};
pub use state_machine::{ReviewEvent, ReviewStateMachine};
