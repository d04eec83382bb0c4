//! 审计日志
//!
//! 只追加的事件记录，提供过滤查询、统计和导出功能

use chrono::{DateTime, Utc};
use review_core::{Actor, AuditAction, AuditLogEntry, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// 操作者预设分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActorPreset {
    #[default]
    All,
    System,
    Doctors,
    Ai,
}

impl ActorPreset {
    fn matches(&self, actor: &Actor) -> bool {
        match self {
            ActorPreset::All => true,
            ActorPreset::System => *actor == Actor::System,
            ActorPreset::Doctors => actor.to_string().starts_with("Doctor"),
            ActorPreset::Ai => *actor == Actor::Ai,
        }
    }
}

/// 审计日志查询条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    /// 操作者分类
    pub preset: ActorPreset,
    /// 操作者名称子串
    pub actor_contains: Option<String>,
    /// 精确匹配的动作
    pub action: Option<AuditAction>,
}

impl AuditQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_preset(mut self, preset: ActorPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor_contains = Some(actor.into());
        self
    }

    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// 检查条目是否匹配
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if !self.preset.matches(&entry.actor) {
            return false;
        }

        if let Some(actor) = &self.actor_contains {
            if !entry.actor.to_string().contains(actor.as_str()) {
                return false;
            }
        }

        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }

        true
    }
}

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

/// 审计统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_entries: usize,
    pub by_action: BTreeMap<AuditAction, usize>,
    pub system_entries: usize,
    pub doctor_entries: usize,
    pub ai_entries: usize,
}

/// 审计日志
#[derive(Debug, Clone)]
pub struct AuditLog {
    scan_id: String,
    entries: Vec<AuditLogEntry>,
    next_seq: u64,
}

impl AuditLog {
    /// 创建空日志
    pub fn new(scan_id: impl Into<String>) -> Self {
        Self {
            scan_id: scan_id.into(),
            entries: Vec::new(),
            next_seq: 1,
        }
    }

    /// 创建带初始条目的日志（扫描导入、扫描分配）
    pub fn seeded(scan_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        let mut log = Self::new(scan_id);
        log.append_at(Actor::System, AuditAction::ScanIngested, at);
        log.append_at(Actor::System, AuditAction::ScanAssigned, at);
        log
    }

    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&AuditLogEntry> {
        self.entries.last()
    }

    /// 追加条目，时间戳取当前时间
    pub fn append(&mut self, actor: Actor, action: AuditAction) -> &AuditLogEntry {
        self.append_at(actor, action, Utc::now())
    }

    fn append_at(&mut self, actor: Actor, action: AuditAction, at: DateTime<Utc>) -> &AuditLogEntry {
        // 时间戳不早于上一条
        let timestamp = match self.entries.last() {
            Some(last) if last.timestamp > at => last.timestamp,
            _ => at,
        };

        let entry = AuditLogEntry {
            seq: self.next_seq,
            timestamp,
            actor,
            action,
            scan_id: self.scan_id.clone(),
        };
        self.next_seq += 1;

        debug!("Audit #{}: {} / {}", entry.seq, entry.actor, entry.action);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// 查询日志，保持追加顺序
    pub fn query(&self, query: &AuditQuery) -> Vec<&AuditLogEntry> {
        self.entries.iter().filter(|entry| query.matches(entry)).collect()
    }

    /// 统计
    pub fn stats(&self) -> AuditStats {
        let mut stats = AuditStats {
            total_entries: self.entries.len(),
            ..Default::default()
        };

        for entry in &self.entries {
            *stats.by_action.entry(entry.action).or_insert(0) += 1;
            match entry.actor {
                Actor::System => stats.system_entries += 1,
                Actor::Doctor(_) => stats.doctor_entries += 1,
                Actor::Ai => stats.ai_entries += 1,
            }
        }

        stats
    }

    /// 导出日志
    pub fn export(&self, query: &AuditQuery, format: ExportFormat) -> Result<String> {
        let entries = self.query(query);

        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
            ExportFormat::Csv => {
                let mut csv_output = String::new();
                csv_output.push_str("seq,timestamp,actor,action,scan_id\n");

                for entry in entries {
                    csv_output.push_str(&format!(
                        "{},{},{},{},{}\n",
                        entry.seq,
                        entry.timestamp.to_rfc3339(),
                        csv_field(&entry.actor.to_string()),
                        csv_field(entry.action.as_str()),
                        csv_field(&entry.scan_id)
                    ));
                }

                Ok(csv_output)
            }
            ExportFormat::Text => {
                let mut text_output = String::new();

                for entry in entries {
                    text_output.push_str(&format!(
                        "[{}] {}: {} ({})\n",
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        entry.actor,
                        entry.action,
                        entry.scan_id
                    ));
                }

                Ok(text_output)
            }
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> AuditLog {
        let mut log = AuditLog::seeded("SCN-2024-001", Utc::now());
        log.append(Actor::Doctor("1".to_string()), AuditAction::DraftSaved);
        log.append(Actor::Doctor("1".to_string()), AuditAction::ReviewSubmitted);
        log.append(Actor::Doctor("12".to_string()), AuditAction::ReviewSubmitted);
        log.append(Actor::System, AuditAction::AiExecuted);
        log
    }

    #[test]
    fn test_append_is_ordered() {
        let log = sample_log();
        let seqs: Vec<u64> = log.entries().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4, 5, 6]);
        assert!(log
            .entries()
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
        assert!(log.entries().iter().all(|e| e.scan_id == "SCN-2024-001"));
    }

    #[test]
    fn test_query_by_preset_actor_and_action() {
        let log = sample_log();

        assert_eq!(log.query(&AuditQuery::all()).len(), 6);
        assert_eq!(log.query(&AuditQuery::all().with_preset(ActorPreset::System)).len(), 3);
        assert_eq!(log.query(&AuditQuery::all().with_preset(ActorPreset::Doctors)).len(), 3);
        assert!(log.query(&AuditQuery::all().with_preset(ActorPreset::Ai)).is_empty());

        // 子串匹配："Doctor 1" 同时命中 "Doctor 12"
        assert_eq!(log.query(&AuditQuery::all().with_actor("Doctor 1")).len(), 3);

        let submitted = log.query(
            &AuditQuery::all()
                .with_preset(ActorPreset::Doctors)
                .with_action(AuditAction::ReviewSubmitted),
        );
        assert_eq!(submitted.len(), 2);
        assert!(submitted[0].seq < submitted[1].seq);
    }

    #[test]
    fn test_stats() {
        let stats = sample_log().stats();
        assert_eq!(stats.total_entries, 6);
        assert_eq!(stats.by_action.get(&AuditAction::ReviewSubmitted), Some(&2));
        assert_eq!(stats.system_entries, 3);
        assert_eq!(stats.doctor_entries, 3);
        assert_eq!(stats.ai_entries, 0);
    }

    #[test]
    fn test_export_formats() {
        let log = sample_log();
        let query = AuditQuery::all().with_action(AuditAction::AiExecuted);

        let csv = log.export(&query, ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "seq,timestamp,actor,action,scan_id");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("System,AI Executed,SCN-2024-001"));

        let json = log.export(&query, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["action"], "AI Executed");
        assert_eq!(value[0]["actor"], "System");

        let text = log.export(&AuditQuery::all(), ExportFormat::Text).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("Doctor 1: Draft Saved (SCN-2024-001)"));
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
