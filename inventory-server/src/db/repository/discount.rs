//! Discount Repository
//!
//! Discount rows plus their component and server link tables. Links are
//! always rewritten as a whole from the submitted selection.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use super::{RepoError, RepoResult};
use crate::pricing::{DiscountTerms, validate_terms};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ComponentCategory, ComponentRef, ComponentSelection, Discount, DiscountCreate, DiscountUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, name, description, discount_type, value, start_date, end_date, created_at, updated_at";

/// Components and servers a discount is attached to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountLinks {
    pub components: ComponentSelection,
    pub servers: BTreeSet<i64>,
}

fn not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::DiscountNotFound, format!("Discount {id} not found"))
        .with_detail("id", id)
        .into()
}

fn name_exists(name: &str) -> RepoError {
    AppError::invalid_field(
        ErrorCode::DiscountNameExists,
        "name",
        format!("Discount '{name}' already exists"),
    )
    .into()
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Discount>> {
    let discounts = sqlx::query_as::<_, Discount>(&format!(
        "SELECT {COLUMNS} FROM discount ORDER BY start_date DESC, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(discounts)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Discount>> {
    let discount =
        sqlx::query_as::<_, Discount>(&format!("SELECT {COLUMNS} FROM discount WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(discount)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Discount>> {
    let discount = sqlx::query_as::<_, Discount>(&format!(
        "SELECT {COLUMNS} FROM discount WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(discount)
}

/// Discounts whose date range contains `day`
pub async fn active_on(pool: &SqlitePool, day: NaiveDate) -> RepoResult<Vec<Discount>> {
    let discounts = sqlx::query_as::<_, Discount>(&format!(
        "SELECT {COLUMNS} FROM discount WHERE start_date <= ?1 AND end_date >= ?1 ORDER BY id"
    ))
    .bind(day)
    .fetch_all(pool)
    .await?;
    Ok(discounts)
}

/// Every (discount_id, component_id) link
pub async fn component_links(pool: &SqlitePool) -> RepoResult<Vec<(i64, i64)>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT discount_id, component_id FROM discount_component",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every (discount_id, server_id) link
pub async fn server_links(pool: &SqlitePool) -> RepoResult<Vec<(i64, i64)>> {
    let rows =
        sqlx::query_as::<_, (i64, i64)>("SELECT discount_id, server_id FROM discount_server")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// Links of every discount, keyed by discount id
pub async fn all_links(pool: &SqlitePool) -> RepoResult<HashMap<i64, DiscountLinks>> {
    let mut links: HashMap<i64, DiscountLinks> = HashMap::new();

    let components = sqlx::query_as::<_, (i64, ComponentCategory, i64)>(
        "SELECT dc.discount_id, c.category, c.id FROM discount_component dc JOIN component c ON c.id = dc.component_id",
    )
    .fetch_all(pool)
    .await?;
    for (discount_id, category, component_id) in components {
        links
            .entry(discount_id)
            .or_default()
            .components
            .insert(ComponentRef::new(category, component_id));
    }

    for (discount_id, server_id) in server_links(pool).await? {
        links.entry(discount_id).or_default().servers.insert(server_id);
    }
    Ok(links)
}

/// Links of one discount
pub async fn links(pool: &SqlitePool, id: i64) -> RepoResult<DiscountLinks> {
    let components = sqlx::query_as::<_, (ComponentCategory, i64)>(
        "SELECT c.category, c.id FROM discount_component dc JOIN component c ON c.id = dc.component_id WHERE dc.discount_id = ?",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let servers = sqlx::query_scalar::<_, i64>(
        "SELECT server_id FROM discount_server WHERE discount_id = ?",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(DiscountLinks {
        components: components
            .into_iter()
            .map(|(category, id)| ComponentRef::new(category, id))
            .collect(),
        servers: servers.into_iter().collect(),
    })
}

async fn replace_links(
    conn: &mut SqliteConnection,
    discount_id: i64,
    components: Option<&ComponentSelection>,
    servers: Option<&BTreeSet<i64>>,
) -> RepoResult<()> {
    if let Some(selection) = components {
        sqlx::query("DELETE FROM discount_component WHERE discount_id = ?")
            .bind(discount_id)
            .execute(&mut *conn)
            .await?;
        for component in selection.refs() {
            super::component::resolve_ref(&mut *conn, component).await?;
            sqlx::query("INSERT INTO discount_component (discount_id, component_id) VALUES (?1, ?2)")
                .bind(discount_id)
                .bind(component.id)
                .execute(&mut *conn)
                .await?;
        }
    }

    if let Some(server_ids) = servers {
        sqlx::query("DELETE FROM discount_server WHERE discount_id = ?")
            .bind(discount_id)
            .execute(&mut *conn)
            .await?;
        for server_id in server_ids {
            let found: Option<i64> = sqlx::query_scalar("SELECT id FROM server WHERE id = ?")
                .bind(server_id)
                .fetch_optional(&mut *conn)
                .await?;
            if found.is_none() {
                return Err(AppError::invalid_field(
                    ErrorCode::ServerNotFound,
                    "servers",
                    format!("Server {server_id} not found"),
                )
                .into());
            }
            sqlx::query("INSERT INTO discount_server (discount_id, server_id) VALUES (?1, ?2)")
                .bind(discount_id)
                .bind(server_id)
                .execute(&mut *conn)
                .await?;
        }
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: DiscountCreate) -> RepoResult<Discount> {
    let name = data.name.trim().to_string();
    let terms = DiscountTerms {
        discount_type: data.discount_type,
        value: data.value,
        start_date: data.start_date,
        end_date: data.end_date,
    };
    validate_terms(&name, &terms)?;

    if find_by_name(pool, &name).await?.is_some() {
        return Err(name_exists(&name));
    }

    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO discount (name, description, discount_type, value, start_date, end_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(&name)
    .bind(&data.description)
    .bind(terms.discount_type)
    .bind(terms.value)
    .bind(terms.start_date)
    .bind(terms.end_date)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    replace_links(&mut tx, id, Some(&data.components), Some(&data.servers)).await?;
    tx.commit().await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create discount".into()))
}

/// Overwrite a discount in place.
///
/// Unset fields keep their stored value; the merged result is validated as
/// a whole so a new end date is checked against the stored start date.
pub async fn update(pool: &SqlitePool, id: i64, data: DiscountUpdate) -> RepoResult<Discount> {
    let existing = get(pool, id).await?.ok_or_else(|| not_found(id))?;

    let name = data
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.name)
        .to_string();
    let terms = DiscountTerms {
        discount_type: data.discount_type.unwrap_or(existing.discount_type),
        value: data.value.unwrap_or(existing.value),
        start_date: data.start_date.unwrap_or(existing.start_date),
        end_date: data.end_date.unwrap_or(existing.end_date),
    };
    validate_terms(&name, &terms)?;

    if let Some(other) = find_by_name(pool, &name).await?
        && other.id != id
    {
        return Err(name_exists(&name));
    }

    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE discount SET name = ?1, description = COALESCE(?2, description), discount_type = ?3, value = ?4, start_date = ?5, end_date = ?6, updated_at = ?7 WHERE id = ?8",
    )
    .bind(&name)
    .bind(&data.description)
    .bind(terms.discount_type)
    .bind(terms.value)
    .bind(terms.start_date)
    .bind(terms.end_date)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    replace_links(&mut tx, id, data.components.as_ref(), data.servers.as_ref()).await?;
    tx.commit().await?;

    get(pool, id).await?.ok_or_else(|| not_found(id))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM discount WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_brand, seed_component, test_pool};
    use shared::models::DiscountType;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn payload(name: &str, components: ComponentSelection) -> DiscountCreate {
        DiscountCreate {
            name: name.to_string(),
            description: None,
            discount_type: DiscountType::Percentage,
            value: 20.0,
            start_date: date("2025-01-01"),
            end_date: date("2025-01-31"),
            components,
            servers: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn test_create_with_selection() {
        let pool = test_pool().await;
        let brand = seed_brand(&pool, "Samsung").await;
        let ram = seed_component(&pool, brand, ComponentCategory::Ram, "64GB", 300.0).await;
        let ssd = seed_component(&pool, brand, ComponentCategory::Storage, "PM1743", 900.0).await;

        let selection: ComponentSelection = [
            ComponentRef::new(ComponentCategory::Ram, ram),
            ComponentRef::new(ComponentCategory::Storage, ssd),
        ]
        .into_iter()
        .collect();

        let discount = create(&pool, payload("January", selection.clone())).await.unwrap();
        assert_eq!(discount.start_date, date("2025-01-01"));

        let stored = links(&pool, discount.id).await.unwrap();
        assert_eq!(stored.components, selection);
        assert!(stored.servers.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_terms_rejected() {
        let pool = test_pool().await;
        let mut data = payload("Too much", ComponentSelection::new());
        data.value = 150.0;

        let err: AppError = create(&pool, data).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::DiscountInvalidValue);
        assert!(list(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_server_rolls_back() {
        let pool = test_pool().await;
        let mut data = payload("Servers", ComponentSelection::new());
        data.servers.insert(77);

        let err: AppError = create(&pool, data).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::ServerNotFound);
        assert!(find_by_name(&pool, "Servers").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_validates_merged_dates() {
        let pool = test_pool().await;
        let discount = create(&pool, payload("Winter", ComponentSelection::new()))
            .await
            .unwrap();

        let err: AppError = update(
            &pool,
            discount.id,
            DiscountUpdate {
                end_date: Some(date("2024-12-31")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err()
        .into();
        assert_eq!(err.code, ErrorCode::DiscountInvalidDateRange);
    }

    #[tokio::test]
    async fn test_update_replaces_selection_only_when_present() {
        let pool = test_pool().await;
        let brand = seed_brand(&pool, "Intel").await;
        let nic = seed_component(&pool, brand, ComponentCategory::NetworkCard, "E810", 480.0).await;
        let selection: ComponentSelection =
            [ComponentRef::new(ComponentCategory::NetworkCard, nic)]
                .into_iter()
                .collect();
        let discount = create(&pool, payload("NIC week", selection.clone())).await.unwrap();

        let updated = update(
            &pool,
            discount.id,
            DiscountUpdate {
                discount_type: Some(DiscountType::Fixed),
                value: Some(50.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.discount_type, DiscountType::Fixed);
        assert_eq!(links(&pool, discount.id).await.unwrap().components, selection);

        update(
            &pool,
            discount.id,
            DiscountUpdate {
                components: Some(ComponentSelection::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(links(&pool, discount.id).await.unwrap().components.is_empty());
    }

    #[tokio::test]
    async fn test_active_on() {
        let pool = test_pool().await;
        create(&pool, payload("January", ComponentSelection::new()))
            .await
            .unwrap();

        assert_eq!(active_on(&pool, date("2025-01-31")).await.unwrap().len(), 1);
        assert!(active_on(&pool, date("2025-02-01")).await.unwrap().is_empty());
        assert!(active_on(&pool, date("2024-12-31")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_component_delete_drops_links() {
        let pool = test_pool().await;
        let brand = seed_brand(&pool, "Kingston").await;
        let ram = seed_component(&pool, brand, ComponentCategory::Ram, "KSM56R46", 250.0).await;
        let selection: ComponentSelection = [ComponentRef::new(ComponentCategory::Ram, ram)]
            .into_iter()
            .collect();
        let discount = create(&pool, payload("RAM", selection)).await.unwrap();

        crate::db::repository::component::delete(&pool, ram).await.unwrap();
        assert!(links(&pool, discount.id).await.unwrap().components.is_empty());
        assert!(all_links(&pool).await.unwrap().get(&discount.id).is_none());
    }
}
