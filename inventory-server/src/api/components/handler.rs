//! Component API Handlers
//!
//! Every read carries the price quote for today.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{parse_filter, price_index};
use crate::core::ServerState;
use crate::db::repository::{component, server};
use crate::utils::result::ApiResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_payload, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, ok};
use shared::models::{
    Component, ComponentCategory, ComponentCreate, ComponentDetail, ComponentUpdate, PriceQuote,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub brand_id: Option<i64>,
}

async fn load(state: &ServerState, id: i64) -> AppResult<Component> {
    component::get(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ComponentNotFound,
            format!("Component {id} not found"),
        )
    })
}

async fn detail(state: &ServerState, component: Component) -> AppResult<ComponentDetail> {
    let index = price_index(state).await?;
    let servers = server::containing(&state.pool, component.id).await?;
    Ok(ComponentDetail {
        pricing: index.component_quote(&component),
        servers,
        component,
    })
}

/// GET /api/components?category=ram&brand_id=1 - 组件列表 (含当前价格)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<ComponentDetail>> {
    let category: Option<ComponentCategory> =
        parse_filter(query.category.as_deref(), "category", ErrorCode::InvalidRequest)?;

    let components = component::list(&state.pool, category, query.brand_id).await?;
    let index = price_index(&state).await?;

    let mut servers_by_component: HashMap<i64, Vec<i64>> = HashMap::new();
    for (server_id, component_id) in server::composition(&state.pool).await? {
        servers_by_component
            .entry(component_id)
            .or_default()
            .push(server_id);
    }

    let details = components
        .into_iter()
        .map(|component| {
            let mut servers = servers_by_component
                .remove(&component.id)
                .unwrap_or_default();
            servers.sort_unstable();
            ComponentDetail {
                pricing: index.component_quote(&component),
                servers,
                component,
            }
        })
        .collect();
    Ok(ok(details))
}

/// GET /api/components/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<ComponentDetail> {
    let component = load(&state, id).await?;
    Ok(ok(detail(&state, component).await?))
}

/// GET /api/components/{id}/price - 当前价格
pub async fn price(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<PriceQuote> {
    let component = load(&state, id).await?;
    let index = price_index(&state).await?;
    Ok(ok(index.component_quote(&component)))
}

/// POST /api/components - 创建组件
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ComponentCreate>,
) -> ApiResult<ComponentDetail> {
    validate_payload(&payload)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let component = component::create(&state.pool, payload).await?;
    tracing::info!(
        component_id = component.id,
        category = %component.category,
        name = %component.name,
        "Component created"
    );
    Ok(ok(detail(&state, component).await?))
}

/// PUT /api/components/{id} - 更新组件
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ComponentUpdate>,
) -> ApiResult<ComponentDetail> {
    validate_payload(&payload)?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let component = component::update(&state.pool, id, payload).await?;
    Ok(ok(detail(&state, component).await?))
}

/// DELETE /api/components/{id} - 删除组件
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<bool> {
    component::delete(&state.pool, id).await?;
    tracing::info!(component_id = id, "Component deleted");
    Ok(ok(true))
}
