//! 支付服务错误类型定义
//!
//! 每个错误对应一个稳定的数字错误码，以 `{"error": {...}}` 信封返回，HTTP 状态码始终为 200。

use axum::response::{IntoResponse, Response};
use game_shared::error::GameError;
use tracing::{error, warn};

use crate::dto::ErrorEnvelope;

/// 支付服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum PayError {
    #[error("temporary database error")]
    Database(#[source] GameError),

    #[error("item does not exist")]
    ItemNotFound,

    #[error("unknown notification_type: {0}")]
    UnknownNotificationType(String),

    #[error("invalid status")]
    InvalidStatus,

    #[error("order already exists")]
    DuplicateOrder,

    #[error("user does not exist")]
    UserNotFound { user_id: String },

    #[error("profile update failed")]
    ProfileUpdateFailed(#[source] GameError),

    #[error("conversion error ({field})")]
    Conversion { field: &'static str },

    #[error("profile modified concurrently")]
    ProfileConflict { user_id: String },
}

pub type Result<T> = std::result::Result<T, PayError>;

impl PayError {
    /// 对外错误码
    pub fn error_code(&self) -> i32 {
        match self {
            Self::Database(_) => 2,
            Self::ItemNotFound => 20,
            Self::UnknownNotificationType(_) => 100,
            Self::InvalidStatus => 101,
            Self::DuplicateOrder => 102,
            Self::UserNotFound { .. } => 103,
            Self::ProfileUpdateFailed(_) => 104,
            Self::Conversion { .. } => 105,
            Self::ProfileConflict { .. } => 106,
        }
    }

    /// 调用方是否应把该错误视为终局结果
    ///
    /// 只有并发冲突允许调用方直接重发同一通知。
    pub fn is_critical(&self) -> bool {
        !matches!(self, Self::ProfileConflict { .. })
    }

    /// 是否为可重试错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ProfileConflict { .. })
    }

    /// 是否由存储层故障引起
    fn is_store_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ProfileUpdateFailed(_))
    }
}

impl IntoResponse for PayError {
    fn into_response(self) -> Response {
        let code = self.error_code();

        if self.is_store_failure() {
            let source = std::error::Error::source(&self)
                .map(|e| e.to_string())
                .unwrap_or_default();
            error!(error_code = code, error = %self, source = %source, "支付请求失败");
        } else {
            warn!(error_code = code, error = %self, "支付请求被拒绝");
        }

        ErrorEnvelope::new(code, self.to_string(), self.is_critical()).into_response()
    }
}
