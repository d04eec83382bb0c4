//! 通用工具函数

/// 规范化登录标识：去除首尾空白并转为小写
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// 生成下一个顺序ID
///
/// 从 `existing + 1` 开始，跳过 `is_taken` 判定为已占用的ID。
pub fn next_sequential_id<F>(existing: usize, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut next = existing + 1;
    while is_taken(&next.to_string()) {
        next += 1;
    }
    next.to_string()
}

/// 医生未填写姓名时的默认显示名
pub fn default_doctor_name(id: &str) -> String {
    format!("Doctor {}", id)
}

/// 简单的邮箱格式检查（仅用于配置校验）
pub fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
