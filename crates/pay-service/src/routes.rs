//! 路由配置模块

use axum::{
    Router, middleware,
    routing::{get, post},
};
use game_shared::http::{cors_layer, fallback, preflight};
use game_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 构建支付服务路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::notify).options(preflight))
        .route(
            "/orders/{user}/{app}",
            get(handlers::list_orders).options(preflight),
        )
        .route(
            "/test/orders/{user}/{app}",
            get(handlers::list_test_orders).options(preflight),
        )
        .route("/healthcheck", get(handlers::healthcheck).options(preflight))
        .fallback(fallback)
}

/// 构建完整应用：路由 + CORS + 可观测性中间件
///
/// 带 `Access-Control-Request-Method` 的预检请求由 CORS 层直接应答。
pub fn app(state: AppState) -> Router {
    api_routes()
        .layer(cors_layer())
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
