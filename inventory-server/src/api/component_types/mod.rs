//! Component type lookup
//!
//! Forms use this table to map a category key to its model type and label.

use axum::{Json, Router, routing::get};

use crate::core::ServerState;
use crate::utils::{ApiResponse, ok};
use shared::models::{ComponentCategory, ComponentType};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/component-types", get(list))
}

/// GET /api/component-types
async fn list() -> Json<ApiResponse<Vec<ComponentType>>> {
    ok(ComponentCategory::ALL
        .iter()
        .copied()
        .map(ComponentType::from)
        .collect())
}
