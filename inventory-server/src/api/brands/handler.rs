//! Brand API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::brand;
use crate::utils::result::ApiResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_payload, validate_required_text};
use crate::utils::{AppError, ErrorCode, ok};
use shared::models::{Brand, BrandCreate, BrandUpdate};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::BrandNotFound, format!("Brand {id} not found"))
}

/// GET /api/brands - 获取所有品牌
pub async fn list(State(state): State<ServerState>) -> ApiResult<Vec<Brand>> {
    let brands = brand::list(&state.pool).await?;
    Ok(ok(brands))
}

/// GET /api/brands/{id} - 获取单个品牌
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<Brand> {
    let brand = brand::get(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ok(brand))
}

/// POST /api/brands - 创建品牌
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BrandCreate>,
) -> ApiResult<Brand> {
    validate_payload(&payload)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let brand = brand::create(&state.pool, payload).await?;
    tracing::info!(brand_id = brand.id, name = %brand.name, "Brand created");
    Ok(ok(brand))
}

/// PUT /api/brands/{id} - 更新品牌
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BrandUpdate>,
) -> ApiResult<Brand> {
    validate_payload(&payload)?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let brand = brand::update(&state.pool, id, payload).await?;
    Ok(ok(brand))
}

/// DELETE /api/brands/{id} - 删除品牌
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<bool> {
    brand::delete(&state.pool, id).await?;
    tracing::info!(brand_id = id, "Brand deleted");
    Ok(ok(true))
}
