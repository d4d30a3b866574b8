// 文件职责：
// 1) 定义认证服务与前端/脚本共用的 HTTP 协议数据结构。
// 2) 提供角色与 UI 权限位的推导规则，保证签发端与消费端一致。
// 3) 作为 Rust 侧协议唯一代码源，供服务端与测试复用。

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// 管理员权限标签。
pub const ADMIN_PERMISSION: &str = "admin";
/// 登录响应中的 token 类型。
pub const TOKEN_TYPE_BEARER: &str = "bearer";
/// 服务展示名。
pub const SERVICE_NAME: &str = "Evil Force JWT Auth API";

/// 每个 token 都会携带的前端功能开关（缺省为 false）。
pub const UI_PERMISSION_FLAGS: [&str; 16] = [
    "tab_dashboard",
    "tab_scan",
    "tab_jwt",
    "tab_fuzzing",
    "tab_osint",
    "tab_shodan",
    "tab_sql",
    "tab_crypto",
    "tab_wordlist",
    "tab_pipeline",
    "tab_fake_pix",
    "tab_database",
    "tab_settings",
    "chat_valac",
    "notifications",
    "vpn_manager",
];

/// 登录请求。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    /// 构造 bearer 类型响应。
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}

/// 对外可见的用户信息（不含密码摘要）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    // 权限标签集合，序列化时按字典序输出。
    pub permissions: BTreeSet<String>,
    pub is_active: bool,
}

/// 注册请求。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub permissions: BTreeSet<String>,
}

/// 局部更新请求：缺省字段保持原值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeSet<String>>,
}

impl UserUpdate {
    /// 是否未携带任何字段。
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.permissions.is_none()
    }
}

/// 简单消息响应。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 服务信息（根路径与 `/api`）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
}

/// token 中的角色，仅有 admin/user 两类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// 由权限集合推导角色：含 `admin` 即为管理员。
    pub fn from_permissions(permissions: &BTreeSet<String>) -> Self {
        if permissions.contains(ADMIN_PERMISSION) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// 由权限集合推导 UI 开关表，所有已知开关都会出现。
/// 只包含 `UI_PERMISSION_FLAGS` 中的键，`admin`/`user` 等普通权限不会写入。
pub fn ui_permissions(permissions: &BTreeSet<String>) -> BTreeMap<String, bool> {
    UI_PERMISSION_FLAGS
        .iter()
        .map(|flag| (flag.to_string(), permissions.contains(*flag)))
        .collect()
}
