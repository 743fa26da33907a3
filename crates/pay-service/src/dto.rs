//! 响应信封
//!
//! 成功：`{"response": <payload>}`；失败：`{"error": {"error_code", "error_msg", "critical"}}`。

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// 成功响应信封
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub response: T,
}

impl<T> ApiResponse<T> {
    pub fn new(response: T) -> Self {
        Self { response }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// 错误详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_code: i32,
    pub error_msg: String,
    pub critical: bool,
}

/// 错误响应信封
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    pub fn new(error_code: i32, error_msg: impl Into<String>, critical: bool) -> Self {
        Self {
            error: ErrorBody {
                error_code,
                error_msg: error_msg.into(),
                critical,
            },
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
