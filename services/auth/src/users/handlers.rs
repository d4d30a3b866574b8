//! 用户 CRUD 接口处理。

use axum::{
    Json,
    extract::{Path, State},
};
use ef_shared_protocol::{MessageResponse, UserCreate, UserUpdate, UserView};
use tracing::{debug, info, warn};

use crate::{
    api::error::ApiError,
    state::AppState,
    users::store::store_error_to_api,
};

/// 用户列表接口。
pub(crate) async fn list_users_handler(State(state): State<AppState>) -> Json<Vec<UserView>> {
    Json(state.list_users().await)
}

/// 注册接口。
pub(crate) async fn create_user_handler(
    State(state): State<AppState>,
    Json(req): Json<UserCreate>,
) -> Result<Json<UserView>, ApiError> {
    state.create_user(req).await.map(Json)
}

/// 局部更新接口。
pub(crate) async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UserUpdate>,
) -> Result<Json<UserView>, ApiError> {
    state.update_user(user_id, req).await.map(Json)
}

/// 删除接口。
pub(crate) async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.delete_user(user_id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

impl AppState {
    /// 全量用户（不含密码摘要）。
    pub(crate) async fn list_users(&self) -> Vec<UserView> {
        let users = self.users.read().await;
        users.list().into_iter().map(|user| user.view()).collect()
    }

    pub(crate) async fn create_user(&self, req: UserCreate) -> Result<UserView, ApiError> {
        let mut users = self.users.write().await;
        match users.create(req) {
            Ok(user) => {
                info!("user created: id={} username={}", user.id, user.username);
                Ok(user.view())
            }
            Err(err) => {
                warn!("create user rejected: {err}");
                Err(store_error_to_api(err))
            }
        }
    }

    pub(crate) async fn update_user(
        &self,
        user_id: i64,
        req: UserUpdate,
    ) -> Result<UserView, ApiError> {
        if req.is_empty() {
            debug!("update user {user_id}: empty payload, record left as is");
        }
        let password_changed = req.password.is_some();
        let mut users = self.users.write().await;
        match users.update(user_id, req) {
            Ok(user) => {
                info!(
                    "user updated: id={} username={} password_changed={password_changed}",
                    user.id, user.username
                );
                Ok(user.view())
            }
            Err(err) => {
                warn!("update user {user_id} rejected: {err}");
                Err(store_error_to_api(err))
            }
        }
    }

    pub(crate) async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        let mut users = self.users.write().await;
        let removed = users.delete(user_id).map_err(|err| {
            warn!("delete user {user_id} rejected: {err}");
            store_error_to_api(err)
        })?;
        info!("user deleted: id={} username={}", removed.id, removed.username);
        Ok(())
    }
}
