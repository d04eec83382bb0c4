//! 配置管理
//!
//! 从 TOML 文件和 `SCAN_REVIEW_` 前缀的环境变量加载配置，支持验证、按路径读写和保存

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use review_core::utils::looks_like_email;
use review_core::{Doctor, ReviewError};
use review_workflow::seed::{DEFAULT_MAX_ASSIGNED_DOCTORS, DEFAULT_SCAN_ID};
use review_workflow::{AdminAccount, SeedData};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "SCAN_REVIEW";

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    /// 配置数据
    config: Arc<RwLock<ReviewConfig>>,
    /// 配置文件路径，未指定时只使用默认值和环境变量
    config_path: Option<String>,
    /// 配置验证器
    validator: ConfigValidator,
}

/// 扫描评审系统完整配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// 扫描配置
    pub scan: ScanConfig,
    /// 管理员账号
    pub admin: AdminConfig,
    /// 初始医生列表
    pub seed_doctors: Vec<DoctorSeed>,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 扫描配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub scan_id: String,
    /// 分配上限
    pub max_assigned_doctors: usize,
    /// 初始分配的医生ID
    pub initial_assignment: Vec<String>,
    /// 初始选中的医生
    pub active_doctor_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

/// 初始医生记录
///
/// 与 [`Doctor`] 不同，这里的密码会被序列化，保存配置时不会丢失。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSeed {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认过滤级别（可被命令行覆盖）
    pub level: String,
    /// 是否输出事件目标
    pub with_target: bool,
}

/// 配置验证器
#[derive(Debug)]
pub struct ConfigValidator {
    /// 验证规则
    validation_rules: Vec<ValidationRule>,
}

/// 验证规则
#[derive(Debug)]
struct ValidationRule {
    /// 字段路径
    field_path: String,
    /// 验证函数
    validator: fn(&ReviewConfig) -> Result<()>,
    /// 错误消息
    error_message: String,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let config = Self::load_config(config_path)?;
        let validator = ConfigValidator::new();
        validator.validate(&config)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: config_path.map(str::to_string),
            validator,
        })
    }

    /// 使用给定配置创建管理器（不读取文件和环境变量）
    pub fn from_config(config: ReviewConfig) -> Result<Self> {
        let validator = ConfigValidator::new();
        validator.validate(&config)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: None,
            validator,
        })
    }

    /// 加载配置
    fn load_config(config_path: Option<&str>) -> Result<ReviewConfig> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(Self::environment_source())
            .build()
            .context("Failed to build configuration sources")?;

        let config: ReviewConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        match config_path {
            Some(path) => info!("Configuration loaded successfully from: {}", path),
            None => info!("Configuration loaded from defaults and environment"),
        }
        Ok(config)
    }

    /// 环境变量来源
    ///
    /// 值保持字符串形式，由反序列化按字段类型转换，`007` 这类密码不会被解析成数字。
    fn environment_source() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("scan.initial_assignment")
    }

    /// 获取配置
    pub async fn get_config(&self) -> ReviewConfig {
        let config = self.config.read().await;
        config.clone()
    }

    /// 更新配置，有文件路径时同时保存
    pub async fn update_config(&self, new_config: ReviewConfig) -> Result<()> {
        self.validator.validate(&new_config)?;

        {
            let mut config = self.config.write().await;
            *config = new_config;
        }

        if self.config_path.is_some() {
            self.save_config().await?;
        }

        info!("Configuration updated successfully");
        Ok(())
    }

    /// 保存配置到文件
    async fn save_config(&self) -> Result<()> {
        let path = self
            .config_path
            .as_deref()
            .context("No configuration file path set")?;
        self.save_to(path).await
    }

    /// 将当前配置写入指定文件
    pub async fn save_to(&self, path: &str) -> Result<()> {
        let config = self.config.read().await;
        let config_str =
            toml::to_string_pretty(&*config).context("Failed to serialize configuration")?;

        tokio::fs::write(path, config_str)
            .await
            .context("Failed to write configuration file")?;

        info!("Configuration saved to: {}", path);
        Ok(())
    }

    /// 重新加载配置
    pub async fn reload_config(&self) -> Result<()> {
        let new_config = Self::load_config(self.config_path.as_deref())?;
        self.validator.validate(&new_config)?;

        let mut config = self.config.write().await;
        *config = new_config;

        info!("Configuration reloaded");
        Ok(())
    }

    /// 获取配置值
    ///
    /// 路径以 `.` 分隔，数组使用数字下标，例如 `seed_doctors.0.email`。
    pub async fn get_value<T>(&self, path: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let config = self.config.read().await;
        let value = Self::extract_nested_value(&config, path)
            .context(format!("Configuration path not found: {}", path))?;

        serde_json::from_value(value).context("Failed to deserialize configuration value")
    }

    /// 设置配置值，修改后的配置需通过验证
    pub async fn set_value<T>(&self, path: &str, value: T) -> Result<()>
    where
        T: Serialize,
    {
        let value_json = serde_json::to_value(value).context("Failed to serialize value")?;

        let mut config = self.config.write().await;
        let updated = Self::set_nested_value(&config, path, value_json)?;
        self.validator.validate(&updated)?;
        *config = updated;

        info!("Configuration value updated: {}", path);
        Ok(())
    }

    /// 提取嵌套值
    fn extract_nested_value(config: &ReviewConfig, path: &str) -> Result<serde_json::Value> {
        let config_json =
            serde_json::to_value(config).context("Failed to serialize config to JSON")?;

        let mut current = &config_json;
        for part in path.split('.') {
            current = match current {
                serde_json::Value::Object(map) => map
                    .get(part)
                    .ok_or_else(|| anyhow::anyhow!("Path segment not found: {}", part))?,
                serde_json::Value::Array(items) => part
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index))
                    .ok_or_else(|| anyhow::anyhow!("Invalid array index: {}", part))?,
                _ => return Err(anyhow::anyhow!("Invalid path at segment: {}", part)),
            };
        }

        Ok(current.clone())
    }

    /// 设置嵌套值，返回修改后的配置副本
    fn set_nested_value(
        config: &ReviewConfig,
        path: &str,
        value: serde_json::Value,
    ) -> Result<ReviewConfig> {
        let mut config_json =
            serde_json::to_value(config).context("Failed to serialize config to JSON")?;

        let mut current = &mut config_json;
        for part in path.split('.') {
            current = match current {
                serde_json::Value::Object(map) => map
                    .get_mut(part)
                    .ok_or_else(|| anyhow::anyhow!("Unsupported configuration path: {}", path))?,
                serde_json::Value::Array(items) => part
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get_mut(index))
                    .ok_or_else(|| anyhow::anyhow!("Invalid array index: {}", part))?,
                _ => return Err(anyhow::anyhow!("Invalid path at segment: {}", part)),
            };
        }
        *current = value;

        serde_json::from_value(config_json)
            .context(format!("Invalid value for configuration path: {}", path))
    }
}

impl ReviewConfig {
    /// 转换为存储使用的初始数据
    pub fn seed_data(&self) -> review_core::Result<SeedData> {
        let mut seen = HashSet::new();
        for doctor in &self.seed_doctors {
            if !seen.insert(doctor.id.as_str()) {
                return Err(ReviewError::Config(format!(
                    "Duplicate doctor id in seed: {}",
                    doctor.id
                )));
            }
        }

        let doctors = self
            .seed_doctors
            .iter()
            .map(|d| Doctor {
                id: d.id.clone(),
                name: d.name.clone(),
                email: d.email.clone(),
                password: d.password.clone(),
            })
            .collect();

        Ok(SeedData {
            scan_id: self.scan.scan_id.clone(),
            max_assigned_doctors: self.scan.max_assigned_doctors,
            admin: AdminAccount {
                email: self.admin.email.clone(),
                password: self.admin.password.clone(),
            },
            doctors,
            initial_assignment: self.scan.initial_assignment.clone(),
            active_doctor_id: self.scan.active_doctor_id.clone(),
        })
    }
}

impl ConfigValidator {
    /// 创建新的配置验证器
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "scan.scan_id".to_string(),
                validator: |config| {
                    if config.scan.scan_id.trim().is_empty() {
                        Err(anyhow::anyhow!("Scan id cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid scan id".to_string(),
            },
            ValidationRule {
                field_path: "scan.max_assigned_doctors".to_string(),
                validator: |config| {
                    let max = config.scan.max_assigned_doctors;
                    if max == 0 || max > DEFAULT_MAX_ASSIGNED_DOCTORS {
                        Err(anyhow::anyhow!(
                            "Max assigned doctors must be between 1 and {}, got {}",
                            DEFAULT_MAX_ASSIGNED_DOCTORS,
                            max
                        ))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid assignment limit".to_string(),
            },
            ValidationRule {
                field_path: "admin.email".to_string(),
                validator: |config| {
                    if !looks_like_email(&config.admin.email) || config.admin.password.is_empty() {
                        Err(anyhow::anyhow!("Admin account needs an email and a password"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid admin account".to_string(),
            },
            ValidationRule {
                field_path: "seed_doctors".to_string(),
                validator: |config| {
                    let mut ids = HashSet::new();
                    for doctor in &config.seed_doctors {
                        if doctor.id.trim().is_empty() || !ids.insert(doctor.id.as_str()) {
                            return Err(anyhow::anyhow!("Doctor id '{}' is empty or duplicated", doctor.id));
                        }
                        if !looks_like_email(&doctor.email) {
                            return Err(anyhow::anyhow!("Doctor {} has an invalid email: {}", doctor.id, doctor.email));
                        }
                    }
                    Ok(())
                },
                error_message: "Invalid seed doctors".to_string(),
            },
            ValidationRule {
                field_path: "scan.initial_assignment".to_string(),
                validator: |config| {
                    let unknown = config
                        .scan
                        .initial_assignment
                        .iter()
                        .find(|id| !config.seed_doctors.iter().any(|d| &d.id == *id));
                    match unknown {
                        Some(id) => Err(anyhow::anyhow!("Assigned doctor {} is not in seed_doctors", id)),
                        None => Ok(()),
                    }
                },
                error_message: "Invalid initial assignment".to_string(),
            },
            ValidationRule {
                field_path: "scan.active_doctor_id".to_string(),
                validator: |config| {
                    let active = &config.scan.active_doctor_id;
                    if config.seed_doctors.iter().any(|d| &d.id == active) {
                        Ok(())
                    } else {
                        Err(anyhow::anyhow!("Active doctor {} is not in seed_doctors", active))
                    }
                },
                error_message: "Invalid active doctor".to_string(),
            },
            ValidationRule {
                field_path: "logging.level".to_string(),
                validator: |config| {
                    if config.logging.level.trim().is_empty() {
                        Err(anyhow::anyhow!("Log level cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid logging configuration".to_string(),
            },
        ];

        Self { validation_rules }
    }

    /// 验证配置
    pub fn validate(&self, config: &ReviewConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                error!("Configuration validation failed for {}: {}", rule.field_path, e);
                return Err(anyhow::anyhow!("{}: {}", rule.error_message, e));
            }
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        let seed_doctors: Vec<DoctorSeed> = SeedData::default()
            .doctors
            .into_iter()
            .map(|d| DoctorSeed {
                id: d.id,
                name: d.name,
                email: d.email,
                password: d.password,
            })
            .collect();

        Self {
            scan: ScanConfig::default(),
            admin: AdminConfig::default(),
            seed_doctors,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_id: DEFAULT_SCAN_ID.to_string(),
            max_assigned_doctors: DEFAULT_MAX_ASSIGNED_DOCTORS,
            initial_assignment: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            active_doctor_id: "1".to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        let admin = AdminAccount::default();
        Self {
            email: admin.email,
            password: admin.password,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}
