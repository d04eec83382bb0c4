//! 初始数据集
//!
//! 存储初始化和重置时使用的固定数据

use review_core::Doctor;
use serde::{Deserialize, Serialize};

use crate::identity::AdminAccount;

/// 默认扫描ID
pub const DEFAULT_SCAN_ID: &str = "SCN-2024-001";
/// 默认分配上限
pub const DEFAULT_MAX_ASSIGNED_DOCTORS: usize = 3;

/// 存储初始数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    pub scan_id: String,
    pub max_assigned_doctors: usize,
    pub admin: AdminAccount,
    pub doctors: Vec<Doctor>,
    pub initial_assignment: Vec<String>,
    pub active_doctor_id: String,
}

impl Default for SeedData {
    fn default() -> Self {
        let doctors: Vec<Doctor> = (1..=3)
            .map(|n| Doctor {
                id: n.to_string(),
                name: format!("Doctor {}", n),
                email: format!("doctor{}@example.com", n),
                password: format!("pass{}", n),
            })
            .collect();
        let initial_assignment = doctors.iter().map(|d| d.id.clone()).collect();

        Self {
            scan_id: DEFAULT_SCAN_ID.to_string(),
            max_assigned_doctors: DEFAULT_MAX_ASSIGNED_DOCTORS,
            admin: AdminAccount::default(),
            doctors,
            initial_assignment,
            active_doctor_id: "1".to_string(),
        }
    }
}
