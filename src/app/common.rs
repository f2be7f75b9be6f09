use crate::api::error::ApiError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

// ==========================================
// 公共工具：错误映射
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

pub fn error_code(err: &ApiError) -> &'static str {
    match err {
        ApiError::LoadError(_) => "LOAD_ERROR",
        ApiError::LookupError(_) => "LOOKUP_ERROR",
        ApiError::EmptySubset(_) => "EMPTY_SUBSET",
        ApiError::InvalidInput(_) => "INVALID_INPUT",
        ApiError::ExportError(_) => "EXPORT_ERROR",
        ApiError::InternalError(_) => "INTERNAL_ERROR",
    }
}

pub fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::LoadError(_) => StatusCode::SERVICE_UNAVAILABLE,
        ApiError::LookupError(_) | ApiError::EmptySubset(_) => StatusCode::NOT_FOUND,
        ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ApiError::ExportError(_) | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 将ApiError转换为错误响应体
pub fn map_api_error(err: &ApiError) -> ErrorResponse {
    ErrorResponse {
        code: error_code(err).to_string(),
        message: err.to_string(),
        details: None,
    }
}

/// JSON 接口的错误包装
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "请求失败");
        } else {
            tracing::warn!(error = %self.0, "请求失败");
        }
        (status, Json(map_api_error(&self.0))).into_response()
    }
}
