//! Bearer token 校验与当前主体解析。

use axum::http::{HeaderMap, header::AUTHORIZATION};
use ef_shared_protocol::UserView;
use tracing::debug;

use crate::{
    api::error::ApiError,
    auth::token::{TokenError, token_error_to_api, unix_now},
    state::AppState,
};

/// 从 `Authorization: Bearer <token>` 中取出 token（scheme 不区分大小写）。
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl AppState {
    /// HTTP 鉴权入口：任何失败原因对外都是 401。
    pub(crate) async fn authenticate_bearer(
        &self,
        headers: &HeaderMap,
    ) -> Result<UserView, ApiError> {
        let token = bearer_token(headers).unwrap_or_default();
        self.verify_token_at(token, unix_now()).await.map_err(|err| {
            debug!("reject bearer token: {err}");
            token_error_to_api(err)
        })
    }

    /// 校验 token 并解析主体；主体已被删除时同样视为无效。
    pub(crate) async fn verify_token_at(
        &self,
        token: &str,
        now: u64,
    ) -> Result<UserView, TokenError> {
        let claims = self.tokens.decode(token, now)?;
        let subject = claims.sub.unwrap_or_default();
        let users = self.users.read().await;
        users
            .find_by_username(&subject)
            .map(|user| user.view())
            .ok_or(TokenError::UnknownSubject(subject))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION};
    use ef_shared_protocol::{LoginRequest, UserUpdate};

    use super::bearer_token;
    use crate::{
        api::types::ACCESS_TOKEN_TTL_SEC,
        auth::token::{TokenError, TokenService, unix_now},
        state::AppState,
        users::store::{UserRegistry, permission_set},
    };

    fn state() -> AppState {
        AppState::new(
            UserRegistry::seeded(),
            TokenService::new("test-secret", ACCESS_TOKEN_TTL_SEC),
        )
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_scheme_is_parsed() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer  abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn login_then_verify_returns_same_principal() {
        let state = state();
        let token = state
            .login(&login("admin", "admin123"))
            .await
            .unwrap()
            .access_token;

        let principal = state.verify_token_at(&token, unix_now()).await.unwrap();
        assert_eq!(principal.id, 1);
        assert_eq!(principal.username, "admin");
        assert_eq!(principal.permissions, permission_set(&["admin", "user"]));
    }

    #[tokio::test]
    async fn token_issued_in_the_past_expires() {
        let state = state();
        let now = unix_now();
        let token = state
            .login_at(&login("user", "user123"), now - ACCESS_TOKEN_TTL_SEC - 1)
            .await
            .unwrap()
            .access_token;

        assert_eq!(
            state.verify_token_at(&token, now).await.unwrap_err(),
            TokenError::Expired
        );
    }

    #[tokio::test]
    async fn deleted_principal_is_rejected() {
        let state = state();
        let token = state
            .login(&login("user", "user123"))
            .await
            .unwrap()
            .access_token;
        state.delete_user(2).await.unwrap();

        assert_eq!(
            state.verify_token_at(&token, unix_now()).await.unwrap_err(),
            TokenError::UnknownSubject("user".to_string())
        );
    }

    #[tokio::test]
    async fn renamed_principal_is_rejected() {
        let state = state();
        let token = state
            .login(&login("user", "user123"))
            .await
            .unwrap()
            .access_token;
        state
            .update_user(
                2,
                UserUpdate {
                    username: Some("renamed".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();

        assert!(state.verify_token_at(&token, unix_now()).await.is_err());
    }

    #[tokio::test]
    async fn every_failure_collapses_to_same_unauthorized() {
        let state = state();
        let valid = state
            .login(&login("user", "user123"))
            .await
            .unwrap()
            .access_token;
        let expired = state
            .login_at(&login("user", "user123"), 1)
            .await
            .unwrap()
            .access_token;
        let mut tampered = valid.clone();
        tampered.push('x');

        let mut bodies = Vec::new();
        for value in [
            format!("Bearer {expired}"),
            format!("Bearer {tampered}"),
            "Bearer not-a-token".to_string(),
        ] {
            let err = state.authenticate_bearer(&headers(&value)).await.unwrap_err();
            assert_eq!(err.status, StatusCode::UNAUTHORIZED);
            bodies.push((err.code, err.message));
        }

        state.delete_user(2).await.unwrap();
        let err = state
            .authenticate_bearer(&headers(&format!("Bearer {valid}")))
            .await
            .unwrap_err();
        bodies.push((err.code, err.message));

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = state().authenticate_bearer(&HeaderMap::new()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
