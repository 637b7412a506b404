//! Unified Result Types
//!
//! Handlers return `AppResult<Json<ApiResponse<T>>>`; this alias keeps their
//! signatures short.

use axum::Json;

use super::{ApiResponse, AppResult};

/// Result of a JSON handler
pub type ApiResult<T> = AppResult<Json<ApiResponse<T>>>;
