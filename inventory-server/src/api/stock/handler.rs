//! Stock API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::parse_filter;
use crate::core::ServerState;
use crate::db::repository::stock;
use crate::utils::result::ApiResult;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, ErrorCode, ok};
use shared::Paginated;
use shared::models::{MovementType, StockLevel, StockMovement, StockMovementInput};

#[derive(Debug, Default, Deserialize)]
pub struct MovementQuery {
    pub component_id: Option<i64>,
    pub movement_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LevelQuery {
    pub page: Option<u32>,
}

/// GET /api/stock/movements?component_id=1&movement_type=in - 出入库记录 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MovementQuery>,
) -> ApiResult<Vec<StockMovement>> {
    let movement_type: Option<MovementType> = parse_filter(
        query.movement_type.as_deref(),
        "movement_type",
        ErrorCode::InvalidRequest,
    )?;
    let movements = stock::list(&state.pool, query.component_id, movement_type).await?;
    Ok(ok(movements))
}

/// GET /api/stock/movements/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<StockMovement> {
    let movement = stock::get(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::StockMovementNotFound,
            format!("Stock movement {id} not found"),
        )
    })?;
    Ok(ok(movement))
}

/// POST /api/stock/movements - 新增出入库记录
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StockMovementInput>,
) -> ApiResult<StockMovement> {
    validate_payload(&payload)?;
    let movement = stock::create(&state.pool, payload, state.config.negative_stock_policy).await?;
    Ok(ok(movement))
}

/// PUT /api/stock/movements/{id} - 整体覆盖
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockMovementInput>,
) -> ApiResult<StockMovement> {
    validate_payload(&payload)?;
    let movement =
        stock::update(&state.pool, id, payload, state.config.negative_stock_policy).await?;
    tracing::info!(movement_id = id, "Stock movement overwritten");
    Ok(ok(movement))
}

/// DELETE /api/stock/movements/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<bool> {
    stock::delete(&state.pool, id, state.config.negative_stock_policy).await?;
    tracing::info!(movement_id = id, "Stock movement deleted");
    Ok(ok(true))
}

/// GET /api/stock/levels?page=N - 库存分页列表
pub async fn levels(
    State(state): State<ServerState>,
    Query(query): Query<LevelQuery>,
) -> ApiResult<Paginated<StockLevel>> {
    let page = query.page.unwrap_or(1).max(1);
    let levels = stock::levels(&state.pool, page, state.config.stock_page_size).await?;
    Ok(ok(levels))
}

/// GET /api/stock/levels/{component_id}
pub async fn level(
    State(state): State<ServerState>,
    Path(component_id): Path<i64>,
) -> ApiResult<StockLevel> {
    Ok(ok(stock::level(&state.pool, component_id).await?))
}
