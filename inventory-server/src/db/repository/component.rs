//! Component Repository

use super::{RepoError, RepoResult};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Component, ComponentCategory, ComponentCreate, ComponentRef, ComponentSpecs, ComponentUpdate,
};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, category, name, brand_id, model, price, image, description, specs, created_at, updated_at";

fn not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::ComponentNotFound, format!("Component {id} not found"))
        .with_detail("id", id)
        .into()
}

/// List components, optionally narrowed to one category and/or brand
pub async fn list(
    pool: &SqlitePool,
    category: Option<ComponentCategory>,
    brand_id: Option<i64>,
) -> RepoResult<Vec<Component>> {
    let components = sqlx::query_as::<_, Component>(&format!(
        "SELECT {COLUMNS} FROM component WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR brand_id = ?2) ORDER BY category, name"
    ))
    .bind(category)
    .bind(brand_id)
    .fetch_all(pool)
    .await?;
    Ok(components)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Component>> {
    let component =
        sqlx::query_as::<_, Component>(&format!("SELECT {COLUMNS} FROM component WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(component)
}

/// Resolve a tagged reference and return the component name.
///
/// Fails with `ComponentNotFound` when the id is unknown and with
/// `ComponentCategoryMismatch` when the id belongs to another category.
pub async fn resolve_ref<'e, E>(executor: E, component: ComponentRef) -> RepoResult<String>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(ComponentCategory, String)> =
        sqlx::query_as("SELECT category, name FROM component WHERE id = ?")
            .bind(component.id)
            .fetch_optional(executor)
            .await?;

    match row {
        None => Err(AppError::with_message(
            ErrorCode::ComponentNotFound,
            format!("Component {} not found", component),
        )
        .with_detail("component", component.to_string())
        .into()),
        Some((category, _)) if category != component.category => Err(AppError::with_message(
            ErrorCode::ComponentCategoryMismatch,
            format!(
                "Component {} is a '{}', not a '{}'",
                component.id, category, component.category
            ),
        )
        .with_detail("component", component.to_string())
        .into()),
        Some((_, name)) => Ok(name),
    }
}

pub async fn create(pool: &SqlitePool, data: ComponentCreate) -> RepoResult<Component> {
    let specs = data
        .specs
        .unwrap_or_else(|| ComponentSpecs::empty(data.category));
    specs.validate_for(data.category)?;
    super::brand::ensure_exists(pool, data.brand_id).await?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO component (category, name, brand_id, model, price, image, description, specs, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) RETURNING id",
    )
    .bind(data.category)
    .bind(data.name.trim())
    .bind(data.brand_id)
    .bind(&data.model)
    .bind(data.price)
    .bind(&data.image)
    .bind(&data.description)
    .bind(Json(&specs))
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create component".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ComponentUpdate) -> RepoResult<Component> {
    let existing = get(pool, id).await?.ok_or_else(|| not_found(id))?;

    if let Some(specs) = &data.specs {
        specs.validate_for(existing.category)?;
    }
    if let Some(brand_id) = data.brand_id {
        super::brand::ensure_exists(pool, brand_id).await?;
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE component SET name = COALESCE(?1, name), brand_id = COALESCE(?2, brand_id), model = COALESCE(?3, model), price = COALESCE(?4, price), image = COALESCE(?5, image), description = COALESCE(?6, description), specs = COALESCE(?7, specs), updated_at = ?8 WHERE id = ?9",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.brand_id)
    .bind(&data.model)
    .bind(data.price)
    .bind(&data.image)
    .bind(&data.description)
    .bind(data.specs.as_ref().map(Json))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }

    get(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Hard delete; refused while the component has stock movements.
///
/// Discount and server associations are removed with it.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    if get(pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let movements: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_movement WHERE component_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if movements > 0 {
        return Err(AppError::with_message(
            ErrorCode::ComponentHasMovements,
            format!("Component {id} has {movements} stock movement(s)"),
        )
        .with_detail("movements", movements)
        .into());
    }

    sqlx::query("DELETE FROM component WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
