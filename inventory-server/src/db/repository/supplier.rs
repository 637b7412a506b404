//! Supplier Repository

use super::{RepoError, RepoResult};
use shared::error::{AppError, ErrorCode};
use shared::models::{Supplier, SupplierCreate, SupplierUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, name, contact_name, email, phone, address, notes, created_at, updated_at";

fn not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::SupplierNotFound, format!("Supplier {id} not found"))
        .with_detail("id", id)
        .into()
}

fn name_exists(name: &str) -> RepoError {
    AppError::invalid_field(
        ErrorCode::SupplierNameExists,
        "name",
        format!("Supplier '{name}' already exists"),
    )
    .into()
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Supplier>> {
    let suppliers = sqlx::query_as::<_, Supplier>(&format!(
        "SELECT {COLUMNS} FROM supplier ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(suppliers)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Supplier>> {
    let supplier =
        sqlx::query_as::<_, Supplier>(&format!("SELECT {COLUMNS} FROM supplier WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(supplier)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Supplier>> {
    let supplier = sqlx::query_as::<_, Supplier>(&format!(
        "SELECT {COLUMNS} FROM supplier WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(supplier)
}

pub async fn create(pool: &SqlitePool, data: SupplierCreate) -> RepoResult<Supplier> {
    let name = data.name.trim().to_string();
    if find_by_name(pool, &name).await?.is_some() {
        return Err(name_exists(&name));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO supplier (name, contact_name, email, phone, address, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(&name)
    .bind(&data.contact_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.notes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create supplier".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: SupplierUpdate) -> RepoResult<Supplier> {
    let name = data.name.as_deref().map(str::trim);
    if let Some(new_name) = name
        && let Some(existing) = find_by_name(pool, new_name).await?
        && existing.id != id
    {
        return Err(name_exists(new_name));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE supplier SET name = COALESCE(?1, name), contact_name = COALESCE(?2, contact_name), email = COALESCE(?3, email), phone = COALESCE(?4, phone), address = COALESCE(?5, address), notes = COALESCE(?6, notes), updated_at = ?7 WHERE id = ?8",
    )
    .bind(name)
    .bind(&data.contact_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(&data.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }

    get(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Hard delete; movements keep their history with the supplier cleared
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM supplier WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}
