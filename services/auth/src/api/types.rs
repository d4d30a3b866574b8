//! 内部存储类型、token claims 与鉴权常量。

use std::collections::{BTreeMap, BTreeSet};

use ef_shared_protocol::{Role, UserView};
use serde::{Deserialize, Serialize};

/// 内存中的用户记录（含密码摘要，不直接对外输出）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserRecord {
    pub(crate) id: i64,
    pub(crate) username: String,
    /// 明文密码的 sha256 hex。
    pub(crate) password_hash: String,
    pub(crate) permissions: BTreeSet<String>,
    /// 仅存储与回显，登录与 token 校验均不检查。
    pub(crate) is_active: bool,
}

impl UserRecord {
    /// 去掉密码摘要后的对外视图。
    pub(crate) fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            permissions: self.permissions.clone(),
            is_active: self.is_active,
        }
    }
}

/// JWT header。
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct JwtHeader {
    pub(crate) alg: String,
    pub(crate) typ: String,
}

/// access token claims。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AccessTokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) sub: Option<String>,
    pub(crate) id: i64,
    pub(crate) role: Role,
    pub(crate) ui_permissions: BTreeMap<String, bool>,
    pub(crate) exp: u64,
}

/// 签名算法标识。
pub(crate) const JWT_ALG: &str = "HS256";
/// JWT 类型标识。
pub(crate) const JWT_TYP: &str = "JWT";
/// 登录签发的 access token 有效期（秒）。
pub(crate) const ACCESS_TOKEN_TTL_SEC: u64 = 30 * 60;
/// 服务版本（与旧接口对齐）。
pub(crate) const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
