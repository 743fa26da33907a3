//! 路由配置模块

use axum::{Router, middleware, routing::get};
use game_shared::http::{cors_layer, fallback, preflight};
use game_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 构建档案服务路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::list_users)
                .post(handlers::create_user)
                .options(preflight),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user)
                .options(preflight),
        )
        .route("/healthcheck", get(handlers::healthcheck).options(preflight))
        .fallback(fallback)
}

/// 构建完整应用：路由 + CORS + 可观测性中间件
pub fn app(state: AppState) -> Router {
    api_routes()
        .layer(cors_layer())
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
