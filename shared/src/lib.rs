//! Shared types for the rack inventory service
//!
//! Domain models, error types, response envelope and pagination used by
//! `inventory-server` and by anything talking to its HTTP API.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use pagination::Paginated;
