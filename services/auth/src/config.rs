//! 配置模块职责：
//! 1. 读取服务运行所需的环境变量，并提供默认值。
//! 2. 注入签名密钥；未配置时生成进程级随机密钥并标记来源。
//! 3. 提供布尔/时长解析等通用能力。

use std::path::PathBuf;

use anyhow::{Context, anyhow};

use crate::api::types::ACCESS_TOKEN_TTL_SEC;

/// 默认监听地址。
pub(crate) const DEFAULT_ADDR: &str = "127.0.0.1:8000";
/// 默认日志根目录（相对当前工作目录）。
const DEFAULT_LOG_DIR: &str = "logs";

const ADDR_ENV: &str = "AUTH_ADDR";
const JWT_SECRET_ENV: &str = "AUTH_JWT_SECRET";
const TOKEN_TTL_MIN_ENV: &str = "AUTH_TOKEN_TTL_MIN";
const SEED_USERS_ENV: &str = "AUTH_SEED_USERS";
const LOG_DIR_ENV: &str = "AUTH_LOG_DIR";

/// 签名密钥来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SecretSource {
    /// 由环境变量注入。
    Env,
    /// 进程启动时随机生成，重启后旧 token 全部失效。
    Generated,
}

/// 服务运行时配置。
#[derive(Clone)]
pub(crate) struct AuthConfig {
    /// HTTP 监听地址。
    pub(crate) addr: String,
    /// HS256 签名密钥。
    pub(crate) jwt_secret: String,
    pub(crate) secret_source: SecretSource,
    /// access token 有效期（秒）。
    pub(crate) token_ttl_sec: u64,
    /// 启动时是否预置演示账号。
    pub(crate) seed_users: bool,
    /// 日志根目录。
    pub(crate) log_dir: PathBuf,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("addr", &self.addr)
            .field("jwt_secret", &"<redacted>")
            .field("secret_source", &self.secret_source)
            .field("token_ttl_sec", &self.token_ttl_sec)
            .field("seed_users", &self.seed_users)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl AuthConfig {
    /// 从进程环境变量构建配置。
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置；空白值视为未设置。
    pub(crate) fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let addr = read(ADDR_ENV).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let (jwt_secret, secret_source) = match read(JWT_SECRET_ENV) {
            Some(secret) => (secret, SecretSource::Env),
            None => (generate_signing_secret(), SecretSource::Generated),
        };
        let token_ttl_sec = match read(TOKEN_TTL_MIN_ENV) {
            Some(raw) => parse_ttl_minutes(&raw)
                .with_context(|| format!("invalid {TOKEN_TTL_MIN_ENV}: {raw}"))?,
            None => ACCESS_TOKEN_TTL_SEC,
        };
        let seed_users = match read(SEED_USERS_ENV) {
            Some(raw) => {
                parse_bool(&raw).ok_or_else(|| anyhow!("invalid {SEED_USERS_ENV}: {raw}"))?
            }
            None => true,
        };
        let log_dir = PathBuf::from(read(LOG_DIR_ENV).unwrap_or_else(|| DEFAULT_LOG_DIR.into()));

        Ok(Self {
            addr,
            jwt_secret,
            secret_source,
            token_ttl_sec,
            seed_users,
            log_dir,
        })
    }
}

/// 生成进程级随机签名密钥。
pub(crate) fn generate_signing_secret() -> String {
    format!(
        "auth_sk_{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// 解析布尔开关。
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// 解析分钟数并转换为秒，必须大于 0。
pub(crate) fn parse_ttl_minutes(raw: &str) -> anyhow::Result<u64> {
    let minutes = raw
        .trim()
        .parse::<u64>()
        .context("ttl must be a whole number of minutes")?;
    if minutes == 0 {
        return Err(anyhow!("ttl must be greater than zero"));
    }
    minutes
        .checked_mul(60)
        .ok_or_else(|| anyhow!("ttl is too large"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{AuthConfig, DEFAULT_ADDR, SecretSource, parse_bool, parse_ttl_minutes};

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AuthConfig> {
        let env = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        AuthConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.token_ttl_sec, 30 * 60);
        assert!(config.seed_users);
        assert_eq!(config.secret_source, SecretSource::Generated);
        assert!(config.jwt_secret.starts_with("auth_sk_"));
    }

    #[test]
    fn generated_secrets_differ_per_process_start() {
        let a = config_from(&[]).unwrap();
        let b = config_from(&[]).unwrap();
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = config_from(&[
            ("AUTH_ADDR", "0.0.0.0:9000"),
            ("AUTH_JWT_SECRET", "  injected  "),
            ("AUTH_TOKEN_TTL_MIN", "5"),
            ("AUTH_SEED_USERS", "off"),
            ("AUTH_LOG_DIR", "/tmp/auth-logs"),
        ])
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:9000");
        assert_eq!(config.jwt_secret, "injected");
        assert_eq!(config.secret_source, SecretSource::Env);
        assert_eq!(config.token_ttl_sec, 300);
        assert!(!config.seed_users);
        assert_eq!(config.log_dir.to_str(), Some("/tmp/auth-logs"));
    }

    #[test]
    fn blank_secret_counts_as_unset() {
        let config = config_from(&[("AUTH_JWT_SECRET", "   ")]).unwrap();
        assert_eq!(config.secret_source, SecretSource::Generated);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config_from(&[("AUTH_TOKEN_TTL_MIN", "0")]).is_err());
        assert!(config_from(&[("AUTH_TOKEN_TTL_MIN", "soon")]).is_err());
        assert!(config_from(&[("AUTH_SEED_USERS", "maybe")]).is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = config_from(&[("AUTH_JWT_SECRET", "top-secret")]).unwrap();
        assert!(!format!("{config:?}").contains("top-secret"));
    }

    #[test]
    fn bool_and_ttl_parsers() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_ttl_minutes("30").unwrap(), 1800);
    }
}
