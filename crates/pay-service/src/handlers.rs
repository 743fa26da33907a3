//! HTTP 请求处理器

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use game_shared::error::GameError;
use game_shared::http::MessageResponse;
use tracing::{error, info};

use crate::dto::ApiResponse;
use crate::error::PayError;
use crate::models::OrderChannel;
use crate::notification::Notification;
use crate::state::AppState;

/// 购买通知入口
///
/// 请求体按配置解码后按 `notification_type` 分发；成功与失败都以 HTTP 200 返回。
/// 非 UTF-8 字节按替换字符处理，不拒绝请求。
///
/// 处理在独立任务中执行：调用方断开连接时请求 future 会被丢弃，
/// 下单、效果与补偿仍会完整执行。
pub async fn notify(State(state): State<AppState>, body: Bytes) -> Response {
    let body = String::from_utf8_lossy(&body);
    let notification = Notification::decode(&body, state.form_decoding);
    info!(
        notification_type = notification.notification_type(),
        body_len = body.len(),
        "收到购买通知"
    );

    let processor = state.processor.clone();
    let task = tokio::spawn(async move { processor.handle(&notification).await });

    match task.await {
        Ok(Ok(outcome)) => ApiResponse::new(outcome).into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(e) => {
            error!(error = %e, "购买通知处理任务异常退出");
            PayError::Database(GameError::Internal(e.to_string())).into_response()
        }
    }
}

/// 查询正式订单
pub async fn list_orders(
    State(state): State<AppState>,
    Path((user, app)): Path<(String, String)>,
) -> Response {
    orders_response(&state, OrderChannel::Live, &user, &app).await
}

/// 查询测试订单
pub async fn list_test_orders(
    State(state): State<AppState>,
    Path((user, app)): Path<(String, String)>,
) -> Response {
    orders_response(&state, OrderChannel::Test, &user, &app).await
}

async fn orders_response(
    state: &AppState,
    channel: OrderChannel,
    user: &str,
    app: &str,
) -> Response {
    let (Ok(receiver_id), Ok(app_id)) = (user.parse::<i64>(), app.parse::<i64>()) else {
        return MessageResponse::new("error params").into_response();
    };

    match state.orders.list(channel, receiver_id, app_id).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => {
            error!(channel = channel.as_str(), error = %e, "订单查询失败");
            MessageResponse::new("database error").into_response()
        }
    }
}

/// 健康检查
pub async fn healthcheck() -> MessageResponse {
    MessageResponse::new("pass")
}
