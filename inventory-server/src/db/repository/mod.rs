//! Repository Module
//!
//! CRUD operations over the SQLite tables. Every repository is a set of free
//! functions taking the pool (or an open transaction) as first argument.

// Catalog
pub mod brand;
pub mod component;
pub mod server;
pub mod supplier;

// Pricing
pub mod discount;

// Stock
pub mod stock;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain rule violation carrying its own error code
    #[error("{0}")]
    Business(AppError),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepoError::Validation(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<AppError> for RepoError {
    fn from(err: AppError) -> Self {
        RepoError::Business(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => {
                tracing::error!(target: "database", error = %msg, "Database error occurred");
                AppError::database("Database error")
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Business(e) => e,
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_error_passes_through() {
        let err = RepoError::from(AppError::new(ErrorCode::InsufficientStock));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_database_error_hides_detail() {
        let app: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(app.message, "Database error");
    }
}
