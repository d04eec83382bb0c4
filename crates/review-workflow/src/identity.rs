//! 身份存储与认证
//!
//! 演示系统：明文密码、无锁定、无限流。真实部署必须改为哈希存储和恒定时间比较。

use review_core::utils::{default_doctor_name, next_sequential_id, normalize_identifier};
use review_core::{Doctor, NewDoctor, Result, ReviewError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 管理员账号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            email: "admin@demo.com".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// 认证结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum AuthOutcome {
    Admin,
    Doctor {
        #[serde(rename = "doctorId")]
        doctor_id: String,
    },
}

/// 身份存储：管理员账号与医生列表
#[derive(Debug, Clone)]
pub struct IdentityStore {
    admin: AdminAccount,
    doctors: Vec<Doctor>,
}

impl IdentityStore {
    pub fn new(admin: AdminAccount, doctors: Vec<Doctor>) -> Self {
        Self { admin, doctors }
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn get(&self, doctor_id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == doctor_id)
    }

    pub fn contains(&self, doctor_id: &str) -> bool {
        self.get(doctor_id).is_some()
    }

    /// 新增医生
    ///
    /// ID 取下一个未被占用的顺序整数；邮箱不做唯一性检查。
    pub fn add(&mut self, request: NewDoctor) -> Result<Doctor> {
        if request.email.trim().is_empty() || request.password.trim().is_empty() {
            return Err(ReviewError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let id = next_sequential_id(self.doctors.len(), |candidate| self.contains(candidate));
        let name = match request.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => default_doctor_name(&id),
        };

        let doctor = Doctor {
            id,
            name,
            email: request.email.trim().to_string(),
            password: request.password,
        };
        self.doctors.push(doctor.clone());

        info!("Added doctor {} ({})", doctor.id, doctor.email);
        Ok(doctor)
    }

    /// 校验凭据
    ///
    /// `is_assigned` 判断医生当前是否分配到扫描；未分配与密码错误返回同一个错误。
    pub fn authenticate<F>(&self, identifier: &str, secret: &str, is_assigned: F) -> Result<AuthOutcome>
    where
        F: Fn(&str) -> bool,
    {
        let user = normalize_identifier(identifier);
        let pass = secret.trim();

        if user == normalize_identifier(&self.admin.email) && pass == self.admin.password {
            return Ok(AuthOutcome::Admin);
        }

        let doctor = self
            .doctors
            .iter()
            .find(|d| d.email.to_lowercase() == user && d.password == pass);

        match doctor {
            Some(doctor) if is_assigned(&doctor.id) => Ok(AuthOutcome::Doctor {
                doctor_id: doctor.id.clone(),
            }),
            _ => {
                warn!("Authentication failed for identifier {}", user);
                Err(ReviewError::AuthFailure)
            }
        }
    }
}
