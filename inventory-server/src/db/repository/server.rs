//! Server Repository

use std::collections::BTreeMap;

use super::{RepoError, RepoResult};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ComponentRef, Server, ServerComponent, ServerComponentInput, ServerCreate, ServerUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, name, brand_id, model, price, image, description, created_at, updated_at";

fn not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::ServerNotFound, format!("Server {id} not found"))
        .with_detail("id", id)
        .into()
}

/// Collapse repeated lines for the same component by summing their quantities
fn merge_lines(lines: &[ServerComponentInput]) -> RepoResult<BTreeMap<ComponentRef, i64>> {
    let mut merged = BTreeMap::new();
    for line in lines {
        if line.quantity < 1 {
            return Err(AppError::invalid_field(
                ErrorCode::InvalidQuantity,
                "components",
                format!("quantity for {} must be at least 1", line.reference()),
            )
            .into());
        }
        *merged.entry(line.reference()).or_insert(0) += line.quantity;
    }
    Ok(merged)
}

async fn replace_components(
    conn: &mut SqliteConnection,
    server_id: i64,
    lines: &[ServerComponentInput],
) -> RepoResult<()> {
    let merged = merge_lines(lines)?;

    sqlx::query("DELETE FROM server_component WHERE server_id = ?")
        .bind(server_id)
        .execute(&mut *conn)
        .await?;

    for (component, quantity) in merged {
        super::component::resolve_ref(&mut *conn, component).await?;
        sqlx::query(
            "INSERT INTO server_component (server_id, component_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(server_id)
        .bind(component.id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Server>> {
    let servers = sqlx::query_as::<_, Server>(&format!("SELECT {COLUMNS} FROM server ORDER BY name"))
        .fetch_all(pool)
        .await?;
    Ok(servers)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Server>> {
    let server = sqlx::query_as::<_, Server>(&format!("SELECT {COLUMNS} FROM server WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(server)
}

/// Bill of materials of one server
pub async fn components(pool: &SqlitePool, server_id: i64) -> RepoResult<Vec<ServerComponent>> {
    let lines = sqlx::query_as::<_, ServerComponent>(
        "SELECT c.category, c.id, c.name, sc.quantity FROM server_component sc JOIN component c ON c.id = sc.component_id WHERE sc.server_id = ? ORDER BY c.category, c.name",
    )
    .bind(server_id)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

/// Ids of every server that contains the component
pub async fn containing(pool: &SqlitePool, component_id: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT server_id FROM server_component WHERE component_id = ? ORDER BY server_id",
    )
    .bind(component_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Every (server_id, component_id) pair
pub async fn composition(pool: &SqlitePool) -> RepoResult<Vec<(i64, i64)>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT server_id, component_id FROM server_component",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: ServerCreate) -> RepoResult<Server> {
    super::brand::ensure_exists(pool, data.brand_id).await?;

    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO server (name, brand_id, model, price, image, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(data.brand_id)
    .bind(&data.model)
    .bind(data.price)
    .bind(&data.image)
    .bind(&data.description)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    replace_components(&mut tx, id, &data.components).await?;
    tx.commit().await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create server".into()))
}

/// Update server fields; a present `components` list replaces the old one
pub async fn update(pool: &SqlitePool, id: i64, data: ServerUpdate) -> RepoResult<Server> {
    if let Some(brand_id) = data.brand_id {
        super::brand::ensure_exists(pool, brand_id).await?;
    }

    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE server SET name = COALESCE(?1, name), brand_id = COALESCE(?2, brand_id), model = COALESCE(?3, model), price = COALESCE(?4, price), image = COALESCE(?5, image), description = COALESCE(?6, description), updated_at = ?7 WHERE id = ?8",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.brand_id)
    .bind(&data.model)
    .bind(data.price)
    .bind(&data.image)
    .bind(&data.description)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }

    if let Some(lines) = &data.components {
        replace_components(&mut tx, id, lines).await?;
    }
    tx.commit().await?;

    get(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Hard delete; composition and discount links go with it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM server WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}
