//! 用户档案服务错误类型定义
//!
//! 错误以 `{"message": "..."}` 返回。除请求体格式错误返回 400 外，HTTP 状态码均为 200，
//! 调用方依靠消息文本区分"不存在"与"数据库错误"。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use game_shared::error::GameError;
use game_shared::http::MessageResponse;
use tracing::{error, warn};

/// 用户档案服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error("Incorrect body")]
    IncorrectBody(String),

    #[error("Database error")]
    ListFailed(#[source] GameError),

    #[error("User with this ID already exists")]
    UserExists(String),

    #[error("Failed insert user")]
    InsertFailed(#[source] GameError),

    #[error("User not found")]
    UserNotFound(String),

    #[error("Failed update user")]
    UpdateFailed(#[source] GameError),

    #[error("Failed delete user")]
    DeleteFailed(#[source] GameError),
}

pub type Result<T> = std::result::Result<T, ProfileServiceError>;

impl ProfileServiceError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::IncorrectBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        }
    }

    /// 是否为可重试错误
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ListFailed(e)
            | Self::InsertFailed(e)
            | Self::UpdateFailed(e)
            | Self::DeleteFailed(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl IntoResponse for ProfileServiceError {
    fn into_response(self) -> Response {
        match &self {
            Self::ListFailed(e)
            | Self::InsertFailed(e)
            | Self::UpdateFailed(e)
            | Self::DeleteFailed(e) => {
                error!(error = %self, source = %e, "档案操作失败");
            }
            Self::IncorrectBody(detail) => warn!(detail = %detail, "请求体无法解析"),
            Self::UserExists(id) | Self::UserNotFound(id) => {
                warn!(user_id = %id, error = %self, "档案请求被拒绝")
            }
        }

        (self.status_code(), MessageResponse::new(self.to_string())).into_response()
    }
}
