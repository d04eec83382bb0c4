//! 分配登记
//!
//! 记录绑定到扫描的医生（最多 `max_assigned` 名）。锁定判断由上层存储负责。

use review_core::{Assignment, Result, ReviewError};
use tracing::debug;

/// 扫描分配登记表
#[derive(Debug, Clone)]
pub struct AssignmentRegistry {
    assignment: Assignment,
    max_assigned: usize,
}

impl AssignmentRegistry {
    /// 创建分配登记表，初始列表同样去重并截断
    pub fn new(scan_id: impl Into<String>, doctor_ids: Vec<String>, max_assigned: usize) -> Self {
        let mut registry = Self {
            assignment: Assignment {
                scan_id: scan_id.into(),
                doctor_ids: Vec::new(),
            },
            max_assigned,
        };
        registry.replace(doctor_ids);
        registry
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn assigned_ids(&self) -> &[String] {
        &self.assignment.doctor_ids
    }

    pub fn is_assigned(&self, doctor_id: &str) -> bool {
        self.assignment.doctor_ids.iter().any(|id| id == doctor_id)
    }

    pub fn len(&self) -> usize {
        self.assignment.doctor_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.doctor_ids.is_empty()
    }

    pub fn max_assigned(&self) -> usize {
        self.max_assigned
    }

    pub fn slots_remaining(&self) -> usize {
        self.max_assigned.saturating_sub(self.len())
    }

    /// 整体替换分配列表
    ///
    /// 重复ID保留首次出现，超出上限的部分静默截断。
    pub fn replace(&mut self, doctor_ids: Vec<String>) -> &[String] {
        let limited = self.limit(doctor_ids);

        debug!("Assignment for {} replaced with {:?}", self.assignment.scan_id, limited);
        self.assignment.doctor_ids = limited;
        &self.assignment.doctor_ids
    }

    /// 去重并截断到上限，不修改登记表
    pub fn limit(&self, doctor_ids: Vec<String>) -> Vec<String> {
        let mut limited: Vec<String> = Vec::with_capacity(self.max_assigned);
        for id in doctor_ids {
            if limited.len() >= self.max_assigned {
                break;
            }
            if !limited.contains(&id) {
                limited.push(id);
            }
        }
        limited
    }

    /// 追加一名医生
    ///
    /// 已分配时返回 `Ok(false)`；达到上限时拒绝。
    pub fn assign(&mut self, doctor_id: &str) -> Result<bool> {
        if self.is_assigned(doctor_id) {
            return Ok(false);
        }
        if self.len() >= self.max_assigned {
            return Err(ReviewError::AssignmentFull { max: self.max_assigned });
        }

        self.assignment.doctor_ids.push(doctor_id.to_string());
        Ok(true)
    }

    /// 移除一名医生，未分配时返回 `false`
    pub fn unassign(&mut self, doctor_id: &str) -> bool {
        let before = self.len();
        self.assignment.doctor_ids.retain(|id| id != doctor_id);
        before != self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_replace_dedupes_and_truncates() {
        let mut registry = AssignmentRegistry::new("SCN-2024-001", Vec::new(), 3);

        let stored = registry.replace(ids(&["2", "2", "1", "4", "3"])).to_vec();
        assert_eq!(stored, ids(&["2", "1", "4"]));
        assert_eq!(registry.slots_remaining(), 0);
    }

    #[test]
    fn test_assign_is_idempotent_and_capped() {
        let mut registry = AssignmentRegistry::new("SCN-2024-001", ids(&["1", "2"]), 3);

        assert_eq!(registry.assign("1").unwrap(), false);
        assert_eq!(registry.assign("3").unwrap(), true);
        assert!(matches!(
            registry.assign("4"),
            Err(ReviewError::AssignmentFull { max: 3 })
        ));
        assert_eq!(registry.assigned_ids(), &ids(&["1", "2", "3"])[..]);
    }

    #[test]
    fn test_unassign() {
        let mut registry = AssignmentRegistry::new("SCN-2024-001", ids(&["1", "2", "3"]), 3);

        assert!(registry.unassign("2"));
        assert!(!registry.unassign("2"));
        assert_eq!(registry.assigned_ids(), &ids(&["1", "3"])[..]);
        assert!(!registry.is_assigned("2"));
    }
}
