//! 用户名密码登录。

use ef_shared_protocol::{LoginRequest, TokenResponse};
use tracing::{info, warn};

use crate::{
    api::error::ApiError,
    auth::{password::verify_password, token::unix_now},
    state::AppState,
};

impl AppState {
    /// 登录：用户名不存在与密码错误返回同一错误，避免枚举用户名。
    pub(crate) async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.login_at(req, unix_now()).await
    }

    /// 以指定时间签发，便于测试模拟时钟。
    pub(crate) async fn login_at(
        &self,
        req: &LoginRequest,
        now: u64,
    ) -> Result<TokenResponse, ApiError> {
        let users = self.users.read().await;
        let Some(user) = users.find_by_username(&req.username) else {
            warn!("login failed: username={} reason=unknown user", req.username);
            return Err(ApiError::bad_credentials());
        };
        if !verify_password(&req.password, &user.password_hash) {
            warn!("login failed: username={} reason=password mismatch", req.username);
            return Err(ApiError::bad_credentials());
        }

        let access_token = self.tokens.mint(user, now);
        info!(
            "login ok: id={} username={} ttl_sec={}",
            user.id,
            user.username,
            self.tokens.ttl_sec()
        );
        Ok(TokenResponse::bearer(access_token))
    }
}
