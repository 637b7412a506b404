//! Server API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::price_index;
use crate::core::ServerState;
use crate::db::repository::server;
use crate::pricing::DiscountIndex;
use crate::utils::result::ApiResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_payload, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, ok};
use shared::models::{PriceQuote, Server, ServerCreate, ServerDetail, ServerUpdate};

async fn load(state: &ServerState, id: i64) -> AppResult<Server> {
    server::get(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ServerNotFound, format!("Server {id} not found"))
    })
}

async fn detail(
    state: &ServerState,
    index: &DiscountIndex,
    server: Server,
) -> AppResult<ServerDetail> {
    let components = server::components(&state.pool, server.id).await?;
    Ok(ServerDetail {
        pricing: index.server_quote(&server),
        components,
        server,
    })
}

/// GET /api/servers - 整机列表 (含组件和当前价格)
pub async fn list(State(state): State<ServerState>) -> ApiResult<Vec<ServerDetail>> {
    let servers = server::list(&state.pool).await?;
    let index = price_index(&state).await?;

    let mut details = Vec::with_capacity(servers.len());
    for s in servers {
        details.push(detail(&state, &index, s).await?);
    }
    Ok(ok(details))
}

/// GET /api/servers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<ServerDetail> {
    let server = load(&state, id).await?;
    let index = price_index(&state).await?;
    Ok(ok(detail(&state, &index, server).await?))
}

/// GET /api/servers/{id}/price - 当前价格
pub async fn price(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<PriceQuote> {
    let server = load(&state, id).await?;
    let index = price_index(&state).await?;
    Ok(ok(index.server_quote(&server)))
}

/// POST /api/servers - 创建整机
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ServerCreate>,
) -> ApiResult<ServerDetail> {
    validate_payload(&payload)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let server = server::create(&state.pool, payload).await?;
    tracing::info!(server_id = server.id, name = %server.name, "Server created");

    let index = price_index(&state).await?;
    Ok(ok(detail(&state, &index, server).await?))
}

/// PUT /api/servers/{id} - 更新整机 (components 存在时整体替换)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ServerUpdate>,
) -> ApiResult<ServerDetail> {
    validate_payload(&payload)?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let server = server::update(&state.pool, id, payload).await?;
    let index = price_index(&state).await?;
    Ok(ok(detail(&state, &index, server).await?))
}

/// DELETE /api/servers/{id} - 删除整机
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<bool> {
    server::delete(&state.pool, id).await?;
    tracing::info!(server_id = id, "Server deleted");
    Ok(ok(true))
}
