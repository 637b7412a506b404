//! Discount API Handlers
//!
//! Status is derived from today's date on every read; it is never stored.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::parse_filter;
use crate::core::ServerState;
use crate::db::repository::discount::{self, DiscountLinks};
use crate::pricing::discount_status;
use crate::utils::result::ApiResult;
use crate::utils::validation::validate_payload;
use crate::utils::{AppError, AppResult, ErrorCode, ok};
use shared::models::{Discount, DiscountCreate, DiscountDetail, DiscountStatus, DiscountUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

fn to_detail(discount: Discount, links: DiscountLinks, today: NaiveDate) -> DiscountDetail {
    DiscountDetail {
        status: discount_status(discount.start_date, discount.end_date, today),
        components: links.components,
        servers: links.servers,
        discount,
    }
}

async fn load_detail(state: &ServerState, id: i64) -> AppResult<DiscountDetail> {
    let discount = discount::get(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::DiscountNotFound,
            format!("Discount {id} not found"),
        )
    })?;
    let links = discount::links(&state.pool, id).await?;
    Ok(to_detail(discount, links, shared::util::today()))
}

/// GET /api/discounts?status=active - 折扣列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<DiscountDetail>> {
    let status: Option<DiscountStatus> = parse_filter(
        query.status.as_deref(),
        "status",
        ErrorCode::DiscountInvalidStatus,
    )?;

    let today = shared::util::today();
    let discounts = discount::list(&state.pool).await?;
    let mut links = discount::all_links(&state.pool).await?;

    let details = discounts
        .into_iter()
        .map(|d| {
            let l = links.remove(&d.id).unwrap_or_default();
            to_detail(d, l, today)
        })
        .filter(|d| status.is_none_or(|s| d.status == s))
        .collect();
    Ok(ok(details))
}

/// GET /api/discounts/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<DiscountDetail> {
    Ok(ok(load_detail(&state, id).await?))
}

/// POST /api/discounts - 创建折扣
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiscountCreate>,
) -> ApiResult<DiscountDetail> {
    validate_payload(&payload)?;

    let created = discount::create(&state.pool, payload).await?;
    tracing::info!(
        discount_id = created.id,
        name = %created.name,
        start = %created.start_date,
        end = %created.end_date,
        "Discount created"
    );
    Ok(ok(load_detail(&state, created.id).await?))
}

/// PUT /api/discounts/{id} - 覆盖更新折扣
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiscountUpdate>,
) -> ApiResult<DiscountDetail> {
    validate_payload(&payload)?;

    let updated = discount::update(&state.pool, id, payload).await?;
    Ok(ok(load_detail(&state, updated.id).await?))
}

/// DELETE /api/discounts/{id} - 删除折扣
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<bool> {
    discount::delete(&state.pool, id).await?;
    tracing::info!(discount_id = id, "Discount deleted");
    Ok(ok(true))
}
