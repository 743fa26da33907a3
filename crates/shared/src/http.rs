//! HTTP 公共层
//!
//! 两个服务共用的 CORS 策略、`{"message": ...}` 响应体与优雅关闭信号。

use axum::{
    Json,
    http::{HeaderName, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// 构建 CORS 层
///
/// 回显请求的 Origin；任意路径的 OPTIONS 预检请求都直接由该层应答。
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::ACCEPT,
            header::ACCEPT_ENCODING,
            HeaderName::from_static("destination"),
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
        ])
}

/// 不带 `Access-Control-Request-Method` 的 OPTIONS 请求不会被 CORS 层拦截，由此应答
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// 未匹配路由：OPTIONS 一律放行，其余返回 404
pub async fn fallback(method: Method) -> StatusCode {
    if method == Method::OPTIONS {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

/// `{"message": "..."}` 形式的简单响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// 监听关闭信号
///
/// K8s 通过 SIGTERM 通知 Pod 停止；本地开发通过 Ctrl+C。
/// 收到任一信号后返回，触发 axum 的优雅关闭流程。
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_accepts_any_options() {
        assert_eq!(fallback(Method::OPTIONS).await, StatusCode::OK);
        assert_eq!(fallback(Method::GET).await, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_message_response_shape() {
        let body = serde_json::to_value(MessageResponse::new("pass")).unwrap();
        assert_eq!(body, serde_json::json!({"message": "pass"}));
    }
}
