//! 评审存储
//!
//! 持有全部实体的唯一存储对象，对外暴露的操作是唯一的修改入口。
//! 每个应用会话构造一次并注入给使用方，不使用全局单例。

use chrono::{DateTime, Utc};
use review_core::{
    Actor, AiResult, AuditAction, AuditLogEntry, Doctor, FinalResult, NewDoctor, Result, Review,
    ReviewError, ReviewFields,
};
use tracing::{info, warn};

use crate::{
    assignment::AssignmentRegistry,
    audit::{AuditLog, AuditQuery},
    identity::{AuthOutcome, IdentityStore},
    ledger::ReviewLedger,
    pipeline::{AnalysisProvider, CompletionCheck, CompletionTrigger, PipelineOutcome, StubAnalysis},
    seed::SeedData,
    session::SessionState,
    state_machine::ReviewEvent,
};

/// 评审存储
///
/// 操作严格顺序执行（`&mut self`），每次账本写入后同步运行完成触发器。
#[derive(Debug)]
pub struct ReviewStore {
    seed: SeedData,
    seeded_at: DateTime<Utc>,
    identity: IdentityStore,
    assignments: AssignmentRegistry,
    ledger: ReviewLedger,
    audit: AuditLog,
    trigger: CompletionTrigger,
    outcome: Option<PipelineOutcome>,
    session: SessionState,
}

impl ReviewStore {
    /// 使用默认数据集和桩分析创建存储
    pub fn new() -> Self {
        Self::with_seed(SeedData::default())
    }

    pub fn with_seed(seed: SeedData) -> Self {
        Self::with_provider(seed, Box::new(StubAnalysis))
    }

    pub fn with_provider(seed: SeedData, provider: Box<dyn AnalysisProvider>) -> Self {
        let seeded_at = Utc::now();
        let (identity, assignments, ledger, audit, session) = Self::initial_state(&seed, seeded_at);
        let trigger = CompletionTrigger::new(provider);

        info!(
            "Review store initialized for {} with {} doctors ({} assigned, analysis '{}')",
            seed.scan_id,
            identity.doctors().len(),
            assignments.len(),
            trigger.provider_name()
        );

        Self {
            seed,
            seeded_at,
            identity,
            assignments,
            ledger,
            audit,
            trigger,
            outcome: None,
            session,
        }
    }

    fn initial_state(
        seed: &SeedData,
        seeded_at: DateTime<Utc>,
    ) -> (IdentityStore, AssignmentRegistry, ReviewLedger, AuditLog, SessionState) {
        let identity = IdentityStore::new(seed.admin.clone(), seed.doctors.clone());
        let assignments = AssignmentRegistry::new(
            seed.scan_id.clone(),
            seed.initial_assignment.clone(),
            seed.max_assigned_doctors,
        );
        let ledger = ReviewLedger::new(seed.doctors.iter().map(|d| d.id.clone()));
        let audit = AuditLog::seeded(seed.scan_id.clone(), seeded_at);
        let session = SessionState::new(seed.active_doctor_id.clone());

        (identity, assignments, ledger, audit, session)
    }

    // ---------------------------------------------------------------------
    // 查询
    // ---------------------------------------------------------------------

    pub fn scan_id(&self) -> &str {
        &self.assignments.assignment().scan_id
    }

    pub fn doctors(&self) -> &[Doctor] {
        self.identity.doctors()
    }

    pub fn doctor(&self, doctor_id: &str) -> Option<&Doctor> {
        self.identity.get(doctor_id)
    }

    pub fn assigned_ids(&self) -> &[String] {
        self.assignments.assigned_ids()
    }

    /// 已分配的医生，按医生列表顺序
    pub fn assigned_doctors(&self) -> Vec<&Doctor> {
        self.identity
            .doctors()
            .iter()
            .filter(|d| self.assignments.is_assigned(&d.id))
            .collect()
    }

    pub fn is_doctor_assigned(&self, doctor_id: &str) -> bool {
        self.assignments.is_assigned(doctor_id)
    }

    pub fn max_assigned_doctors(&self) -> usize {
        self.assignments.max_assigned()
    }

    pub fn slots_remaining(&self) -> usize {
        self.assignments.slots_remaining()
    }

    /// 已分配医生中有任一评审不再是未开始时，分配冻结
    pub fn assignment_locked(&self) -> bool {
        self.ledger.any_started(self.assignments.assigned_ids())
    }

    pub fn reviews(&self) -> &[Review] {
        self.ledger.reviews()
    }

    /// 获取评审，未知医生返回空白评审
    pub fn review(&self, doctor_id: &str) -> Review {
        self.ledger.review_or_blank(doctor_id)
    }

    /// 已分配医生的评审，按分配顺序
    pub fn assigned_reviews(&self) -> Vec<Review> {
        self.ledger.assigned_reviews(self.assignments.assigned_ids())
    }

    /// 已分配医生中已锁定的评审数
    pub fn completion_count(&self) -> usize {
        self.ledger.locked_count(self.assignments.assigned_ids())
    }

    pub fn completion_check(&self) -> CompletionCheck {
        CompletionTrigger::check(&self.ledger, self.assignments.assigned_ids())
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    pub fn audit_entries(&self, query: &AuditQuery) -> Vec<&AuditLogEntry> {
        self.audit.query(query)
    }

    pub fn ai_result(&self) -> Option<&AiResult> {
        self.outcome.as_ref().map(|o| &o.ai_result)
    }

    pub fn final_result(&self) -> Option<FinalResult> {
        self.outcome.as_ref().map(|o| o.final_result)
    }

    pub fn analysis_provider(&self) -> &str {
        self.trigger.provider_name()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    // ---------------------------------------------------------------------
    // 身份认证
    // ---------------------------------------------------------------------

    /// 校验凭据，不修改会话
    pub fn authenticate(&self, identifier: &str, secret: &str) -> Result<AuthOutcome> {
        self.identity
            .authenticate(identifier, secret, |id| self.assignments.is_assigned(id))
    }

    /// 登录：医生登录成功后成为当前登录及选中的医生
    pub fn login(&mut self, identifier: &str, secret: &str) -> Result<AuthOutcome> {
        let outcome = self.authenticate(identifier, secret)?;

        match &outcome {
            AuthOutcome::Admin => info!("Admin logged in"),
            AuthOutcome::Doctor { doctor_id } => {
                self.session.log_in(doctor_id);
                info!("Doctor {} logged in", doctor_id);
            }
        }

        Ok(outcome)
    }

    pub fn logout(&mut self) {
        if let Some(doctor_id) = self.session.logged_doctor_id() {
            info!("Doctor {} logged out", doctor_id);
        }
        self.session.log_out();
    }

    pub fn select_active_doctor(&mut self, doctor_id: &str) -> Result<()> {
        self.ensure_known(doctor_id)?;
        self.session.select_active(doctor_id);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // 分配与医生管理
    // ---------------------------------------------------------------------

    /// 整体设置分配列表，返回实际保存的列表（去重并截断到上限）
    pub fn set_assignments(&mut self, doctor_ids: Vec<String>) -> Result<Vec<String>> {
        self.ensure_assignment_unlocked("set assignments")?;

        let limited = self.assignments.limit(doctor_ids);
        for id in &limited {
            self.ensure_known(id)?;
        }

        let stored = self.assignments.replace(limited).to_vec();
        self.audit.append(Actor::System, AuditAction::ScanAssigned);

        info!("Assignments for {} set to {:?}", self.scan_id(), stored);
        Ok(stored)
    }

    /// 分配一名医生，已分配时返回 `Ok(false)` 且不记录审计
    pub fn assign_doctor(&mut self, doctor_id: &str) -> Result<bool> {
        self.ensure_assignment_unlocked("assign doctor")?;
        self.ensure_known(doctor_id)?;

        let added = self.assignments.assign(doctor_id).map_err(|e| {
            warn!("Assigning doctor {} rejected: {}", doctor_id, e);
            e
        })?;

        if added {
            self.audit.append(Actor::System, AuditAction::ScanAssigned);
            info!("Doctor {} assigned to {}", doctor_id, self.scan_id());
        }
        Ok(added)
    }

    /// 取消分配，未分配时返回 `Ok(false)` 且不记录审计
    pub fn unassign_doctor(&mut self, doctor_id: &str) -> Result<bool> {
        self.ensure_assignment_unlocked("unassign doctor")?;
        self.ensure_known(doctor_id)?;

        let removed = self.assignments.unassign(doctor_id);
        if removed {
            self.audit.append(Actor::System, AuditAction::ScanAssigned);
            info!("Doctor {} unassigned from {}", doctor_id, self.scan_id());
        }
        Ok(removed)
    }

    /// 新增医生并为其创建未开始的评审
    pub fn add_doctor(&mut self, request: NewDoctor) -> Result<Doctor> {
        self.ensure_assignment_unlocked("add doctor")?;

        let doctor = self.identity.add(request)?;
        self.ledger.open(&doctor.id);
        self.audit.append(Actor::System, AuditAction::DoctorAdded);

        Ok(doctor)
    }

    // ---------------------------------------------------------------------
    // 评审账本
    // ---------------------------------------------------------------------

    /// 医生打开评审页面，记录会话提示
    pub fn open_review(&mut self, doctor_id: &str) -> Result<Review> {
        self.ensure_assigned(doctor_id)?;

        let review = self.review(doctor_id);
        let scan_id = self.scan_id().to_string();
        self.session.record_open(&scan_id, review.status);
        Ok(review)
    }

    /// 保存草稿，不校验字段完整性
    pub fn save_draft(&mut self, doctor_id: &str, fields: ReviewFields) -> Result<Review> {
        self.write_review(doctor_id, ReviewEvent::SaveDraft, fields)
    }

    /// 提交并锁定评审
    ///
    /// 必填字段由调用方通过 [`ReviewFields::validate_for_submit`] 校验。
    pub fn submit_review(&mut self, doctor_id: &str, fields: ReviewFields) -> Result<Review> {
        self.write_review(doctor_id, ReviewEvent::Submit, fields)
    }

    fn write_review(&mut self, doctor_id: &str, event: ReviewEvent, fields: ReviewFields) -> Result<Review> {
        self.ensure_assigned(doctor_id)?;

        let now = Utc::now();
        let review = self
            .ledger
            .apply(doctor_id, event, fields, now)
            .map_err(|e| {
                warn!("Review write {:?} by doctor {} rejected: {}", event, doctor_id, e);
                e
            })?
            .clone();

        let action = match event {
            ReviewEvent::SaveDraft => AuditAction::DraftSaved,
            ReviewEvent::Submit => AuditAction::ReviewSubmitted,
        };
        self.audit.append(Actor::Doctor(doctor_id.to_string()), action);
        self.session.record_status(review.status, now);

        self.run_completion_trigger();
        Ok(review)
    }

    /// 账本写入后的钩子
    fn run_completion_trigger(&mut self) {
        let outcome = self.trigger.evaluate(
            &self.assignments.assignment().scan_id,
            &self.ledger,
            self.assignments.assigned_ids(),
            self.outcome.is_some(),
        );

        if let Some(outcome) = outcome {
            self.audit.append(Actor::System, AuditAction::AiExecuted);
            self.audit.append(Actor::System, AuditAction::FinalResultLocked);
            self.outcome = Some(outcome);
        }
    }

    // ---------------------------------------------------------------------
    // 重置
    // ---------------------------------------------------------------------

    /// 恢复全部实体到初始值，并追加一条重置记录
    pub fn reset(&mut self) {
        let (identity, assignments, ledger, audit, session) =
            Self::initial_state(&self.seed, self.seeded_at);

        self.identity = identity;
        self.assignments = assignments;
        self.ledger = ledger;
        self.audit = audit;
        self.session = session;
        self.outcome = None;

        self.audit.append(Actor::System, AuditAction::MockDataReset);
        info!("Mock data reset for {}", self.scan_id());
    }

    // ---------------------------------------------------------------------
    // 内部校验
    // ---------------------------------------------------------------------

    fn ensure_known(&self, doctor_id: &str) -> Result<()> {
        if self.identity.contains(doctor_id) {
            Ok(())
        } else {
            Err(ReviewError::DoctorNotFound(doctor_id.to_string()))
        }
    }

    fn ensure_assigned(&self, doctor_id: &str) -> Result<()> {
        self.ensure_known(doctor_id)?;
        if self.assignments.is_assigned(doctor_id) {
            Ok(())
        } else {
            warn!("Doctor {} is not assigned to {}", doctor_id, self.scan_id());
            Err(ReviewError::NotAssigned(doctor_id.to_string()))
        }
    }

    fn ensure_assignment_unlocked(&self, operation: &str) -> Result<()> {
        if self.assignment_locked() {
            warn!("Cannot {}: assignments locked because a review has started", operation);
            Err(ReviewError::AssignmentLocked)
        } else {
            Ok(())
        }
    }
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::ActorPreset;
    use review_core::ReviewStatus;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn acne() -> ReviewFields {
        ReviewFields::new("Acne Vulgaris", "High", "")
    }

    fn actions(store: &ReviewStore) -> Vec<AuditAction> {
        store.audit_log().entries().iter().map(|e| e.action).collect()
    }

    #[test]
    fn test_initial_state() {
        let store = ReviewStore::new();

        assert_eq!(store.scan_id(), "SCN-2024-001");
        assert_eq!(store.doctors().len(), 3);
        assert_eq!(store.assigned_ids(), &ids(&["1", "2", "3"])[..]);
        assert!(store.reviews().iter().all(|r| r.status == ReviewStatus::NotStarted));
        assert_eq!(actions(&store), vec![AuditAction::ScanIngested, AuditAction::ScanAssigned]);
        assert!(store.ai_result().is_none());
        assert!(store.final_result().is_none());
        assert!(!store.assignment_locked());
        assert_eq!(store.session().active_doctor_id(), "1");
        assert!(store.session().logged_doctor_id().is_none());
    }

    #[test]
    fn test_full_review_cycle_runs_analysis_once() {
        let mut store = ReviewStore::new();
        store.set_assignments(ids(&["1", "2", "3"])).unwrap();

        store.submit_review("1", acne()).unwrap();
        assert_eq!(store.completion_count(), 1);
        assert!(store.ai_result().is_none());

        store.submit_review("2", acne()).unwrap();
        assert_eq!(store.completion_count(), 2);
        assert!(store.ai_result().is_none());

        let before = store.audit_log().len();
        store.submit_review("3", acne()).unwrap();

        let ai = store.ai_result().unwrap();
        assert_eq!(ai.condition, "Acne Vulgaris");
        assert_eq!(ai.confidence, "High");
        assert!(ai.notes.starts_with("Detected multiple inflammatory lesions"));
        assert_eq!(store.final_result(), Some(FinalResult::Match));

        // 提交记录 + 两条触发器记录
        let tail: Vec<AuditAction> = actions(&store)[before..].to_vec();
        assert_eq!(
            tail,
            vec![
                AuditAction::ReviewSubmitted,
                AuditAction::AiExecuted,
                AuditAction::FinalResultLocked
            ]
        );

        // 锁定后再写入被拒绝，触发器不会再次运行
        assert!(store.submit_review("3", acne()).is_err());
        let executed = store
            .audit_entries(&AuditQuery::all().with_action(AuditAction::AiExecuted))
            .len();
        assert_eq!(executed, 1);
    }

    #[test]
    fn test_draft_step_is_optional_and_counts_as_started() {
        let mut store = ReviewStore::new();

        store.save_draft("2", ReviewFields::new("", "", "first look")).unwrap();
        assert_eq!(store.review("2").status, ReviewStatus::Draft);
        assert!(store.assignment_locked());

        store.submit_review("1", acne()).unwrap();
        assert_eq!(store.review("1").status, ReviewStatus::Locked);
        assert_eq!(
            store.audit_log().last().unwrap().actor,
            Actor::Doctor("1".to_string())
        );
    }

    #[test]
    fn test_ledger_accepts_incomplete_submission() {
        let mut store = ReviewStore::new();
        let fields = ReviewFields::default();
        assert!(fields.validate_for_submit().is_err());

        let review = store.submit_review("1", fields).unwrap();
        assert_eq!(review.status, ReviewStatus::Locked);
        assert!(review.condition.is_empty());
    }

    #[test]
    fn test_authentication_scenarios() {
        let mut store = ReviewStore::new();

        assert_eq!(store.authenticate("admin@demo.com", "admin123").unwrap(), AuthOutcome::Admin);
        assert!(matches!(
            store.authenticate("doctor1@example.com", "wrong"),
            Err(ReviewError::AuthFailure)
        ));

        store.set_assignments(ids(&["2", "3"])).unwrap();
        assert!(matches!(
            store.authenticate("doctor1@example.com", "pass1"),
            Err(ReviewError::AuthFailure)
        ));

        let outcome = store.login("DOCTOR2@example.com", " pass2 ").unwrap();
        assert_eq!(outcome, AuthOutcome::Doctor { doctor_id: "2".to_string() });
        assert_eq!(store.session().logged_doctor_id(), Some("2"));
        assert_eq!(store.session().effective_doctor_id(), "2");

        store.logout();
        assert!(store.session().logged_doctor_id().is_none());
    }

    #[test]
    fn test_assignment_frozen_once_review_started() {
        let mut store = ReviewStore::new();
        store.set_assignments(ids(&["1", "2"])).unwrap();
        store.save_draft("1", ReviewFields::default()).unwrap();

        let log_len = store.audit_log().len();
        assert!(matches!(store.set_assignments(ids(&["3"])), Err(ReviewError::AssignmentLocked)));
        assert!(matches!(store.assign_doctor("3"), Err(ReviewError::AssignmentLocked)));
        assert!(matches!(store.unassign_doctor("2"), Err(ReviewError::AssignmentLocked)));
        assert_eq!(store.assigned_ids(), &ids(&["1", "2"])[..]);
        assert_eq!(store.audit_log().len(), log_len);
    }

    #[test]
    fn test_locked_reviewer_cannot_be_unassigned() {
        let mut store = ReviewStore::new();
        store.submit_review("1", acne()).unwrap();

        let result = store.unassign_doctor("1");
        assert!(matches!(result, Err(ReviewError::AssignmentLocked)));
        assert!(store.is_doctor_assigned("1"));
        assert_eq!(store.completion_check().assigned, 3);
        assert_eq!(store.completion_check().locked, 1);
    }

    #[test]
    fn test_assign_and_unassign_before_lock() {
        let mut store = ReviewStore::new();

        assert!(matches!(
            store.assign_doctor("1"),
            Ok(false)
        ));
        assert!(matches!(
            store.assign_doctor("4"),
            Err(ReviewError::DoctorNotFound(_))
        ));

        let log_len = store.audit_log().len();
        assert!(store.unassign_doctor("3").unwrap());
        assert!(!store.unassign_doctor("3").unwrap());
        assert_eq!(store.audit_log().len(), log_len + 1);

        let doctor = store
            .add_doctor(NewDoctor {
                name: Some("Dr. Ada".to_string()),
                email: "ada@example.com".to_string(),
                password: "pass4".to_string(),
            })
            .unwrap();
        assert_eq!(doctor.id, "4");

        assert!(store.assign_doctor("4").unwrap());
        assert!(matches!(
            store.assign_doctor("3"),
            Err(ReviewError::AssignmentFull { max: 3 })
        ));
        assert_eq!(store.slots_remaining(), 0);
    }

    #[test]
    fn test_set_assignments_truncates_silently() {
        let mut store = ReviewStore::new();
        store
            .add_doctor(NewDoctor {
                name: None,
                email: "doctor4@example.com".to_string(),
                password: "pass4".to_string(),
            })
            .unwrap();

        let stored = store.set_assignments(ids(&["4", "3", "2", "1", "99"])).unwrap();
        assert_eq!(stored, ids(&["4", "3", "2"]));
        assert!(!store.is_doctor_assigned("1"));
    }

    #[test]
    fn test_add_doctor_rejected_after_review_started() {
        let mut store = ReviewStore::new();
        store.save_draft("3", ReviewFields::default()).unwrap();

        let doctors = store.doctors().len();
        let reviews = store.reviews().len();
        let log_len = store.audit_log().len();

        let result = store.add_doctor(NewDoctor {
            name: None,
            email: "late@example.com".to_string(),
            password: "late".to_string(),
        });

        assert!(matches!(result, Err(ReviewError::AssignmentLocked)));
        assert_eq!(store.doctors().len(), doctors);
        assert_eq!(store.reviews().len(), reviews);
        assert_eq!(store.audit_log().len(), log_len);
    }

    #[test]
    fn test_add_doctor_creates_review_and_audit_entry() {
        let mut store = ReviewStore::new();
        let doctor = store
            .add_doctor(NewDoctor {
                name: Some("  ".to_string()),
                email: "doctor4@example.com".to_string(),
                password: "pass4".to_string(),
            })
            .unwrap();

        assert_eq!(doctor.name, "Doctor 4");
        assert_eq!(store.review("4").status, ReviewStatus::NotStarted);
        assert_eq!(store.audit_log().last().unwrap().action, AuditAction::DoctorAdded);
        assert!(!store.is_doctor_assigned("4"));
    }

    #[test]
    fn test_unassigned_doctor_cannot_write() {
        let mut store = ReviewStore::new();
        store.set_assignments(ids(&["1", "2"])).unwrap();
        let log_len = store.audit_log().len();

        assert!(matches!(
            store.save_draft("3", acne()),
            Err(ReviewError::NotAssigned(_))
        ));
        assert!(matches!(
            store.submit_review("7", acne()),
            Err(ReviewError::DoctorNotFound(_))
        ));
        assert_eq!(store.audit_log().len(), log_len);
        assert!(!store.assignment_locked());
    }

    #[test]
    fn test_empty_assignment_never_triggers() {
        let mut store = ReviewStore::new();
        store.set_assignments(Vec::new()).unwrap();

        assert_eq!(store.completion_check().assigned, 0);
        assert!(store.submit_review("1", acne()).is_err());
        assert!(store.ai_result().is_none());
    }

    #[test]
    fn test_select_active_doctor() {
        let mut store = ReviewStore::new();

        store.select_active_doctor("3").unwrap();
        assert_eq!(store.session().active_doctor_id(), "3");
        assert_eq!(store.session().effective_doctor_id(), "3");

        assert!(matches!(
            store.select_active_doctor("9"),
            Err(ReviewError::DoctorNotFound(_))
        ));
        assert_eq!(store.session().active_doctor_id(), "3");

        store.login("doctor2@example.com", "pass2").unwrap();
        store.select_active_doctor("1").unwrap();
        assert_eq!(store.session().effective_doctor_id(), "2");
    }

    #[test]
    fn test_open_review_records_hints() {
        let mut store = ReviewStore::new();
        store.login("doctor1@example.com", "pass1").unwrap();

        let review = store.open_review("1").unwrap();
        assert_eq!(review.status, ReviewStatus::NotStarted);
        assert_eq!(store.session().hints().current_scan_id.as_deref(), Some("SCN-2024-001"));

        store.submit_review("1", acne()).unwrap();
        assert_eq!(store.session().hints().current_status, Some(ReviewStatus::Locked));
        assert!(store.session().hints().locked_at.is_some());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let fresh = ReviewStore::new();
        let mut store = ReviewStore::new();

        store.login("doctor2@example.com", "pass2").unwrap();
        store
            .add_doctor(NewDoctor {
                name: None,
                email: "doctor4@example.com".to_string(),
                password: "pass4".to_string(),
            })
            .unwrap();
        for id in ["1", "2", "3"] {
            store.submit_review(id, acne()).unwrap();
        }
        assert!(store.final_result().is_some());

        let seed_entries: Vec<AuditLogEntry> = store.audit_log().entries()[..2].to_vec();
        store.reset();

        assert_eq!(store.doctors(), fresh.doctors());
        assert_eq!(store.reviews(), fresh.reviews());
        assert_eq!(store.assigned_ids(), fresh.assigned_ids());
        assert!(store.ai_result().is_none());
        assert!(store.final_result().is_none());
        assert!(!store.assignment_locked());
        assert_eq!(store.session().active_doctor_id(), "1");
        assert!(store.session().logged_doctor_id().is_none());

        let entries = store.audit_log().entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(&entries[..2], &seed_entries[..]);
        assert_eq!(entries[2].action, AuditAction::MockDataReset);
        assert_eq!(entries[2].actor, Actor::System);
        assert_eq!(
            store
                .audit_entries(&AuditQuery::all().with_preset(ActorPreset::Doctors))
                .len(),
            0
        );
    }

    #[derive(Debug)]
    struct CountingAnalysis;

    impl AnalysisProvider for CountingAnalysis {
        fn name(&self) -> &str {
            "counting"
        }

        fn analyze(&self, _scan_id: &str, reviews: &[Review]) -> AiResult {
            AiResult {
                condition: format!("{} reviews", reviews.len()),
                confidence: "Low".to_string(),
                notes: String::new(),
            }
        }
    }

    #[test]
    fn test_injected_analysis_provider() {
        let mut store = ReviewStore::with_provider(SeedData::default(), Box::new(CountingAnalysis));
        store.set_assignments(ids(&["2"])).unwrap();
        store.submit_review("2", acne()).unwrap();

        assert_eq!(store.analysis_provider(), "counting");
        assert_eq!(store.ai_result().unwrap().condition, "1 reviews");
        assert_eq!(store.final_result(), Some(FinalResult::Match));
    }
}
