//! 服务装配：路由、CORS 与监听。

use axum::{
    Json, Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post, put},
};
use ef_shared_protocol::{SERVICE_NAME, ServiceInfo};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::{
    api::types::SERVICE_VERSION,
    auth::handlers::{login_handler, me_handler},
    config::{AuthConfig, SecretSource},
    state::AppState,
    users::handlers::{
        create_user_handler, delete_user_handler, list_users_handler, update_user_handler,
    },
};

/// 服务入口：装配状态并启动 HTTP 监听。
pub(crate) async fn run(config: AuthConfig) -> anyhow::Result<()> {
    if config.secret_source == SecretSource::Generated {
        warn!("AUTH_JWT_SECRET not set; using a per-process secret, tokens will not survive restart");
    }
    let state = AppState::from_config(&config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!("ef-auth listening on {}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// 构建路由（测试直接复用）。
pub(crate) fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .route("/", get(service_info))
        .route("/api", get(service_info))
        .route("/healthz", get(healthz))
        .route("/api/login", post(login_handler))
        .route(
            "/api/users",
            get(list_users_handler).post(create_user_handler),
        )
        .route(
            "/api/users/{user_id}",
            put(update_user_handler).delete(delete_user_handler),
        )
        .route("/api/me", get(me_handler))
        .layer(cors)
        .with_state(state)
}

/// 健康检查接口。
async fn healthz() -> &'static str {
    "ok"
}

/// 服务名与版本。
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
    })
}
