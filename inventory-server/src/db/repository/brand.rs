//! Brand Repository

use super::{RepoError, RepoResult};
use shared::error::{AppError, ErrorCode};
use shared::models::{Brand, BrandCreate, BrandUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, website, image, created_at, updated_at";

fn not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::BrandNotFound, format!("Brand {id} not found"))
        .with_detail("id", id)
        .into()
}

fn name_exists(name: &str) -> RepoError {
    AppError::invalid_field(
        ErrorCode::BrandNameExists,
        "name",
        format!("Brand '{name}' already exists"),
    )
    .into()
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Brand>> {
    let brands = sqlx::query_as::<_, Brand>(&format!(
        "SELECT {COLUMNS} FROM brand ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(brands)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Brand>> {
    let brand = sqlx::query_as::<_, Brand>(&format!("SELECT {COLUMNS} FROM brand WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(brand)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Brand>> {
    let brand = sqlx::query_as::<_, Brand>(&format!(
        "SELECT {COLUMNS} FROM brand WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(brand)
}

/// Fail with `BrandNotFound` unless the brand exists
pub async fn ensure_exists(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM brand WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(AppError::invalid_field(
            ErrorCode::BrandNotFound,
            "brand_id",
            format!("Brand {id} not found"),
        )
        .into()),
    }
}

pub async fn create(pool: &SqlitePool, data: BrandCreate) -> RepoResult<Brand> {
    let name = data.name.trim().to_string();
    if find_by_name(pool, &name).await?.is_some() {
        return Err(name_exists(&name));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO brand (name, website, image, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(&name)
    .bind(&data.website)
    .bind(&data.image)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create brand".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: BrandUpdate) -> RepoResult<Brand> {
    let name = data.name.as_deref().map(str::trim);
    if let Some(new_name) = name
        && let Some(existing) = find_by_name(pool, new_name).await?
        && existing.id != id
    {
        return Err(name_exists(new_name));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE brand SET name = COALESCE(?1, name), website = COALESCE(?2, website), image = COALESCE(?3, image), updated_at = ?4 WHERE id = ?5",
    )
    .bind(name)
    .bind(&data.website)
    .bind(&data.image)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }

    get(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Hard delete; refused while components or servers still reference the brand
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    if get(pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let references: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM component WHERE brand_id = ?1) + (SELECT COUNT(*) FROM server WHERE brand_id = ?1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    if references > 0 {
        return Err(AppError::with_message(
            ErrorCode::BrandInUse,
            format!("Brand {id} is used by {references} component(s) or server(s)"),
        )
        .with_detail("references", references)
        .into());
    }

    sqlx::query("DELETE FROM brand WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_component, test_pool};
    use shared::models::ComponentCategory;

    fn create_payload(name: &str) -> BrandCreate {
        BrandCreate {
            name: name.to_string(),
            website: Some("https://www.supermicro.com".into()),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;

        let brand = create(&pool, create_payload("  Supermicro ")).await.unwrap();
        assert_eq!(brand.name, "Supermicro");
        assert!(brand.created_at > 0);

        let fetched = get(&pool, brand.id).await.unwrap().unwrap();
        assert_eq!(fetched.website.as_deref(), Some("https://www.supermicro.com"));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let pool = test_pool().await;
        create(&pool, create_payload("Dell")).await.unwrap();

        let err = create(&pool, create_payload("Dell")).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::BrandNameExists);
        assert!(app.details.unwrap().contains_key("name"));
    }

    #[tokio::test]
    async fn test_update_partial() {
        let pool = test_pool().await;
        let brand = create(&pool, create_payload("HPE")).await.unwrap();

        let updated = update(
            &pool,
            brand.id,
            BrandUpdate {
                image: Some("abc.jpg".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "HPE");
        assert_eq!(updated.image.as_deref(), Some("abc.jpg"));
        assert_eq!(updated.website, brand.website);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let pool = test_pool().await;
        let err: AppError = update(&pool, 99, BrandUpdate::default())
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::BrandNotFound);
    }

    #[tokio::test]
    async fn test_delete_in_use_refused() {
        let pool = test_pool().await;
        let brand = create(&pool, create_payload("Kingston")).await.unwrap();
        seed_component(&pool, brand.id, ComponentCategory::Ram, "KSM64R52", 320.0).await;

        let err: AppError = delete(&pool, brand.id).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::BrandInUse);
        assert!(get(&pool, brand.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_unused() {
        let pool = test_pool().await;
        let brand = create(&pool, create_payload("Noctua")).await.unwrap();

        delete(&pool, brand.id).await.unwrap();
        assert!(get(&pool, brand.id).await.unwrap().is_none());
        assert!(list(&pool).await.unwrap().is_empty());
    }
}
