//! 会话状态
//!
//! 当前选中/登录的医生，以及页面之间传递的临时提示。提示只作参考，权威数据在存储中。

use chrono::{DateTime, Utc};
use review_core::ReviewStatus;
use serde::{Deserialize, Serialize};

/// 页面间传递的临时提示
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHints {
    pub current_scan_id: Option<String>,
    pub current_status: Option<ReviewStatus>,
    pub locked_at: Option<DateTime<Utc>>,
}

/// 会话状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    active_doctor_id: String,
    logged_doctor_id: Option<String>,
    hints: SessionHints,
}

impl SessionState {
    pub fn new(active_doctor_id: impl Into<String>) -> Self {
        Self {
            active_doctor_id: active_doctor_id.into(),
            logged_doctor_id: None,
            hints: SessionHints::default(),
        }
    }

    pub fn active_doctor_id(&self) -> &str {
        &self.active_doctor_id
    }

    pub fn logged_doctor_id(&self) -> Option<&str> {
        self.logged_doctor_id.as_deref()
    }

    /// 登录医生优先，否则为当前选中医生
    pub fn effective_doctor_id(&self) -> &str {
        self.logged_doctor_id.as_deref().unwrap_or(&self.active_doctor_id)
    }

    pub fn select_active(&mut self, doctor_id: impl Into<String>) {
        self.active_doctor_id = doctor_id.into();
    }

    pub fn log_in(&mut self, doctor_id: &str) {
        self.active_doctor_id = doctor_id.to_string();
        self.logged_doctor_id = Some(doctor_id.to_string());
    }

    pub fn log_out(&mut self) {
        self.logged_doctor_id = None;
    }

    pub fn hints(&self) -> &SessionHints {
        &self.hints
    }

    pub(crate) fn record_open(&mut self, scan_id: &str, status: ReviewStatus) {
        self.hints.current_scan_id = Some(scan_id.to_string());
        self.hints.current_status = Some(status);
    }

    pub(crate) fn record_status(&mut self, status: ReviewStatus, at: DateTime<Utc>) {
        self.hints.current_status = Some(status);
        if status == ReviewStatus::Locked {
            self.hints.locked_at = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_doctor_prefers_logged_in() {
        let mut session = SessionState::new("1");
        assert_eq!(session.effective_doctor_id(), "1");

        session.log_in("3");
        assert_eq!(session.effective_doctor_id(), "3");
        assert_eq!(session.active_doctor_id(), "3");

        session.select_active("2");
        assert_eq!(session.effective_doctor_id(), "3");

        session.log_out();
        assert_eq!(session.effective_doctor_id(), "2");
    }

    #[test]
    fn test_hints() {
        let mut session = SessionState::new("1");
        session.record_open("SCN-2024-001", ReviewStatus::NotStarted);
        session.record_status(ReviewStatus::Draft, Utc::now());
        assert_eq!(session.hints().current_status, Some(ReviewStatus::Draft));
        assert!(session.hints().locked_at.is_none());

        let at = Utc::now();
        session.record_status(ReviewStatus::Locked, at);
        assert_eq!(session.hints().locked_at, Some(at));
        assert_eq!(session.hints().current_scan_id.as_deref(), Some("SCN-2024-001"));
    }
}
