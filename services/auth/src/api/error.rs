//! API 错误定义与响应转换。

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};

use super::response::ErrorBody;

/// 登录失败统一文案（不区分用户名不存在与密码错误）。
pub(crate) const BAD_CREDENTIALS_MESSAGE: &str = "Incorrect username or password";
/// bearer 校验失败统一文案。
pub(crate) const INVALID_CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

/// 认证与接口错误。
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) code: &'static str,
    pub(crate) message: String,
}

impl ApiError {
    /// 构造统一 API 错误。
    pub(crate) fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 登录凭证错误（400，保持与旧客户端一致）。
    pub(crate) fn bad_credentials() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "BAD_CREDENTIALS",
            BAD_CREDENTIALS_MESSAGE,
        )
    }

    /// bearer token 无效、过期或主体已不存在。
    pub(crate) fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            INVALID_CREDENTIALS_MESSAGE,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let unauthorized = self.status == StatusCode::UNAUTHORIZED;
        let mut response = (
            self.status,
            Json(ErrorBody {
                detail: self.message,
                code: self.code.to_string(),
            }),
        )
            .into_response();
        if unauthorized {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{StatusCode, header::WWW_AUTHENTICATE},
        response::IntoResponse,
    };

    use super::ApiError;

    #[test]
    fn unauthorized_sets_bearer_challenge() {
        let response = ApiError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn bad_credentials_is_plain_bad_request() {
        let response = ApiError::bad_credentials().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }
}
