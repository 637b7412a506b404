//! Stock Movement Repository
//!
//! Movements are the only stored stock data; levels are aggregated on read.
//! Every write runs in a transaction so the negative stock check and the
//! write see the same balances.

use super::{RepoError, RepoResult};
use crate::core::NegativeStockPolicy;
use crate::stock::{BalanceChange, check_policy, net_change, signed_effect};
use chrono::NaiveDate;
use shared::Paginated;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ComponentCategory, ComponentRef, MAX_MOVEMENT_QUANTITY, MovementType, StockLevel,
    StockMovement, StockMovementInput,
};
use shared::pagination;
use sqlx::{SqliteConnection, SqlitePool};

const SELECT_MOVEMENT: &str = "SELECT m.id, m.component_id, c.category, c.name AS component_name, m.quantity, m.movement_type, m.supplier_id, s.name AS supplier_name, m.date, m.notes, m.created_at, m.updated_at FROM stock_movement m JOIN component c ON c.id = m.component_id LEFT JOIN supplier s ON s.id = m.supplier_id";

const SIGNED_SUM: &str =
    "COALESCE(SUM(CASE WHEN m.movement_type = 'in' THEN m.quantity ELSE -m.quantity END), 0)";

#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: i64,
    component_id: i64,
    category: ComponentCategory,
    component_name: String,
    quantity: i64,
    movement_type: MovementType,
    supplier_id: Option<i64>,
    supplier_name: Option<String>,
    date: NaiveDate,
    notes: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<MovementRow> for StockMovement {
    fn from(row: MovementRow) -> Self {
        Self {
            id: row.id,
            component: ComponentRef::new(row.category, row.component_id),
            component_name: row.component_name,
            quantity: row.quantity,
            movement_type: row.movement_type,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            date: row.date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LevelRow {
    component_id: i64,
    category: ComponentCategory,
    component_name: String,
    quantity: i64,
    last_movement_date: Option<NaiveDate>,
}

impl From<LevelRow> for StockLevel {
    fn from(row: LevelRow) -> Self {
        Self {
            component: ComponentRef::new(row.category, row.component_id),
            component_name: row.component_name,
            quantity: row.quantity,
            last_movement_date: row.last_movement_date,
        }
    }
}

fn not_found(id: i64) -> RepoError {
    AppError::with_message(
        ErrorCode::StockMovementNotFound,
        format!("Stock movement {id} not found"),
    )
    .with_detail("id", id)
    .into()
}

/// List movements newest first, optionally for one component and/or direction
pub async fn list(
    pool: &SqlitePool,
    component_id: Option<i64>,
    movement_type: Option<MovementType>,
) -> RepoResult<Vec<StockMovement>> {
    let rows = sqlx::query_as::<_, MovementRow>(&format!(
        "{SELECT_MOVEMENT} WHERE (?1 IS NULL OR m.component_id = ?1) AND (?2 IS NULL OR m.movement_type = ?2) ORDER BY m.date DESC, m.id DESC"
    ))
    .bind(component_id)
    .bind(movement_type)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(StockMovement::from).collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<StockMovement>> {
    let row = sqlx::query_as::<_, MovementRow>(&format!("{SELECT_MOVEMENT} WHERE m.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(StockMovement::from))
}

/// Current balance of one component inside an open connection/transaction
async fn balance_of(conn: &mut SqliteConnection, component_id: i64) -> RepoResult<i64> {
    let balance = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT {SIGNED_SUM} FROM stock_movement m WHERE m.component_id = ?"
    ))
    .bind(component_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(balance)
}

async fn ensure_supplier(conn: &mut SqliteConnection, supplier_id: Option<i64>) -> RepoResult<()> {
    let Some(id) = supplier_id else {
        return Ok(());
    };
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM supplier WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(AppError::invalid_field(
            ErrorCode::SupplierNotFound,
            "supplier_id",
            format!("Supplier {id} not found"),
        )
        .into()),
    }
}

/// Validate a movement payload inside the write transaction
async fn check_input(conn: &mut SqliteConnection, input: &StockMovementInput) -> RepoResult<()> {
    if !(1..=MAX_MOVEMENT_QUANTITY).contains(&input.quantity) {
        return Err(AppError::invalid_field(
            ErrorCode::InvalidQuantity,
            "quantity",
            format!("quantity must be between 1 and {MAX_MOVEMENT_QUANTITY}"),
        )
        .into());
    }
    super::component::resolve_ref(&mut *conn, input.component).await?;
    ensure_supplier(conn, input.supplier_id).await
}

async fn guard(
    conn: &mut SqliteConnection,
    policy: NegativeStockPolicy,
    component: ComponentRef,
    delta: i64,
) -> RepoResult<()> {
    if policy == NegativeStockPolicy::Allow || delta >= 0 {
        return Ok(());
    }
    let current = balance_of(conn, component.id).await?;
    check_policy(
        policy,
        &BalanceChange {
            component,
            current,
            delta,
        },
    )?;
    Ok(())
}

/// Append a movement
pub async fn create(
    pool: &SqlitePool,
    input: StockMovementInput,
    policy: NegativeStockPolicy,
) -> RepoResult<StockMovement> {
    let mut tx = pool.begin().await?;
    check_input(&mut tx, &input).await?;
    guard(
        &mut tx,
        policy,
        input.component,
        signed_effect(input.movement_type, input.quantity),
    )
    .await?;

    let now = shared::util::now_millis();
    let date = input.date.unwrap_or_else(shared::util::today);
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO stock_movement (component_id, quantity, movement_type, supplier_id, date, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(input.component.id)
    .bind(input.quantity)
    .bind(input.movement_type)
    .bind(input.supplier_id)
    .bind(date)
    .bind(&input.notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(
        movement_id = id,
        component = %input.component,
        movement_type = input.movement_type.as_str(),
        quantity = input.quantity,
        "Stock movement recorded"
    );

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create stock movement".into()))
}

/// Overwrite a movement with a complete new payload
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    input: StockMovementInput,
    policy: NegativeStockPolicy,
) -> RepoResult<StockMovement> {
    let mut tx = pool.begin().await?;

    let old: Option<(i64, MovementType, i64)> = sqlx::query_as(
        "SELECT component_id, movement_type, quantity FROM stock_movement WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;
    let (old_component_id, old_type, old_quantity) = old.ok_or_else(|| not_found(id))?;

    check_input(&mut tx, &input).await?;

    let old_effect = signed_effect(old_type, old_quantity);
    let new_effect = signed_effect(input.movement_type, input.quantity);
    if old_component_id == input.component.id {
        let delta = net_change(old_effect, new_effect)?;
        guard(&mut tx, policy, input.component, delta).await?;
    } else {
        let old_category: ComponentCategory =
            sqlx::query_scalar("SELECT category FROM component WHERE id = ?")
                .bind(old_component_id)
                .fetch_one(&mut *tx)
                .await?;
        let old_component = ComponentRef::new(old_category, old_component_id);
        guard(&mut tx, policy, old_component, -old_effect).await?;
        guard(&mut tx, policy, input.component, new_effect).await?;
    }

    let now = shared::util::now_millis();
    let date = input.date.unwrap_or_else(shared::util::today);
    sqlx::query(
        "UPDATE stock_movement SET component_id = ?1, quantity = ?2, movement_type = ?3, supplier_id = ?4, date = ?5, notes = ?6, updated_at = ?7 WHERE id = ?8",
    )
    .bind(input.component.id)
    .bind(input.quantity)
    .bind(input.movement_type)
    .bind(input.supplier_id)
    .bind(date)
    .bind(&input.notes)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    get(pool, id).await?.ok_or_else(|| not_found(id))
}

pub async fn delete(pool: &SqlitePool, id: i64, policy: NegativeStockPolicy) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let old: Option<(i64, ComponentCategory, MovementType, i64)> = sqlx::query_as(
        "SELECT m.component_id, c.category, m.movement_type, m.quantity FROM stock_movement m JOIN component c ON c.id = m.component_id WHERE m.id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;
    let (component_id, category, movement_type, quantity) = old.ok_or_else(|| not_found(id))?;

    guard(
        &mut tx,
        policy,
        ComponentRef::new(category, component_id),
        -signed_effect(movement_type, quantity),
    )
    .await?;

    sqlx::query("DELETE FROM stock_movement WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// One page of stock levels, one row per catalog component
pub async fn levels(pool: &SqlitePool, page: u32, per_page: u32) -> RepoResult<Paginated<StockLevel>> {
    let page = page.max(1);
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM component")
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, LevelRow>(&format!(
        "SELECT c.id AS component_id, c.category, c.name AS component_name, {SIGNED_SUM} AS quantity, MAX(m.date) AS last_movement_date FROM component c LEFT JOIN stock_movement m ON m.component_id = c.id GROUP BY c.id ORDER BY c.category, c.name, c.id LIMIT ?1 OFFSET ?2"
    ))
    .bind(per_page as i64)
    .bind(pagination::offset(page, per_page) as i64)
    .fetch_all(pool)
    .await?;

    Ok(Paginated::new(
        rows.into_iter().map(StockLevel::from).collect(),
        total.max(0) as u64,
        page,
        per_page,
    ))
}

/// Stock level of one component
pub async fn level(pool: &SqlitePool, component_id: i64) -> RepoResult<StockLevel> {
    let row = sqlx::query_as::<_, LevelRow>(&format!(
        "SELECT c.id AS component_id, c.category, c.name AS component_name, {SIGNED_SUM} AS quantity, MAX(m.date) AS last_movement_date FROM component c LEFT JOIN stock_movement m ON m.component_id = c.id WHERE c.id = ? GROUP BY c.id"
    ))
    .bind(component_id)
    .fetch_optional(pool)
    .await?;

    row.map(StockLevel::from).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ComponentNotFound,
            format!("Component {component_id} not found"),
        )
        .into()
    })
}
