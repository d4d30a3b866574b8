//! 服务共享状态：用户注册表与 token 服务句柄。

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::{auth::token::TokenService, config::AuthConfig, users::store::UserRegistry};

/// 服务共享状态。
#[derive(Clone)]
pub(crate) struct AppState {
    /// 用户注册表（内存）；每次变更在同一把写锁内完成检查与写入。
    pub(crate) users: Arc<RwLock<UserRegistry>>,
    /// token 签发与校验。
    pub(crate) tokens: Arc<TokenService>,
}

impl AppState {
    pub(crate) fn new(registry: UserRegistry, tokens: TokenService) -> Self {
        Self {
            users: Arc::new(RwLock::new(registry)),
            tokens: Arc::new(tokens),
        }
    }

    /// 按运行配置装配状态。
    pub(crate) fn from_config(config: &AuthConfig) -> Self {
        let registry = if config.seed_users {
            UserRegistry::seeded()
        } else {
            UserRegistry::default()
        };
        info!("user registry ready with {} account(s)", registry.len());
        Self::new(
            registry,
            TokenService::new(config.jwt_secret.clone(), config.token_ttl_sec),
        )
    }
}
