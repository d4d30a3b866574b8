//! 鉴权 HTTP 路由处理函数。

use axum::{Json, extract::State, http::HeaderMap};
use ef_shared_protocol::{LoginRequest, TokenResponse, UserView};

use crate::{api::error::ApiError, state::AppState};

/// 登录接口：校验用户名密码并签发 access token。
pub(crate) async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    state.login(&req).await.map(Json)
}

/// 当前登录用户接口（需 bearer token）。
pub(crate) async fn me_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserView>, ApiError> {
    state.authenticate_bearer(&headers).await.map(Json)
}
