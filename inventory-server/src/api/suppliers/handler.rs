//! Supplier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::supplier;
use crate::utils::result::ApiResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_payload, validate_required_text,
};
use crate::utils::{AppError, ErrorCode, ok};
use shared::models::{Supplier, SupplierCreate, SupplierUpdate};

fn validate_notes(address: &Option<String>, notes: &Option<String>) -> Result<(), AppError> {
    validate_optional_text(address, "address", MAX_NOTE_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)
}

/// GET /api/suppliers - 获取所有供应商
pub async fn list(State(state): State<ServerState>) -> ApiResult<Vec<Supplier>> {
    let suppliers = supplier::list(&state.pool).await?;
    Ok(ok(suppliers))
}

/// GET /api/suppliers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<Supplier> {
    let supplier = supplier::get(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::SupplierNotFound,
            format!("Supplier {id} not found"),
        )
    })?;
    Ok(ok(supplier))
}

/// POST /api/suppliers - 创建供应商
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SupplierCreate>,
) -> ApiResult<Supplier> {
    validate_payload(&payload)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_notes(&payload.address, &payload.notes)?;

    let supplier = supplier::create(&state.pool, payload).await?;
    tracing::info!(supplier_id = supplier.id, name = %supplier.name, "Supplier created");
    Ok(ok(supplier))
}

/// PUT /api/suppliers/{id} - 更新供应商
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SupplierUpdate>,
) -> ApiResult<Supplier> {
    validate_payload(&payload)?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_notes(&payload.address, &payload.notes)?;

    let supplier = supplier::update(&state.pool, id, payload).await?;
    Ok(ok(supplier))
}

/// DELETE /api/suppliers/{id} - 删除供应商 (库存记录保留，供应商置空)
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<bool> {
    supplier::delete(&state.pool, id).await?;
    tracing::info!(supplier_id = id, "Supplier deleted");
    Ok(ok(true))
}
