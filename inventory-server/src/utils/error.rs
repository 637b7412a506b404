//! 统一错误处理
//!
//! 错误类型和响应结构来自 `shared::error`，这里补充处理器常用的构造函数。
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Brand 3"))
//!
//! // 返回成功响应
//! Ok(ok(brand))
//! ```

use axum::{Json, extract::multipart::MultipartError};
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Multipart 解析失败视为请求格式错误
pub fn multipart_error(e: MultipartError) -> AppError {
    AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
}
