//! Order Repository (dine-in subset)
//!
//! The table name is `customer_order` because `order` is reserved in SQL.

use shared::models::{Order, OrderCreate, OrderStatus};
use sqlx::{Sqlite, SqlitePool};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, code, kind, location, item_count, guest_count, table_id, status, created_at, updated_at";

/// Find order by id
pub async fn find_by_id(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM customer_order WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(order)
}

/// Find order by human-readable code
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM customer_order WHERE code = ? LIMIT 1"
    ))
    .bind(code.to_string())
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

/// Create a new order (status PENDING, no table bound)
pub async fn create(pool: &SqlitePool, code: &str, data: OrderCreate) -> RepoResult<Order> {
    if data.item_count < 0 {
        return Err(RepoError::Validation(format!(
            "Item count cannot be negative: {}",
            data.item_count
        )));
    }
    if let Some(guests) = data.guest_count
        && guests < 1
    {
        return Err(RepoError::Validation(format!(
            "Guest count must be positive: {guests}"
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO customer_order (id, code, kind, location, item_count, guest_count, table_id, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, NULL, 'PENDING', ?, ?)",
    )
    .bind(id)
    .bind(code.to_string())
    .bind(data.kind)
    .bind(data.location)
    .bind(data.item_count)
    .bind(data.guest_count)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Active (non-terminal) orders bound to a table
pub async fn find_active_for_table(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    table_id: i64,
) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM customer_order WHERE table_id = ? AND status NOT IN ('COMPLETED', 'CANCELLED') ORDER BY created_at"
    ))
    .bind(table_id)
    .fetch_all(ex)
    .await?;
    Ok(orders)
}

/// Optimistic status update: succeeds only from the expected prior status
pub async fn set_status(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer_order SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(to)
    .bind(now)
    .bind(id)
    .bind(from)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

/// Bind a table. Set-once, dine-in only.
pub async fn bind_table(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
    table_id: i64,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer_order SET table_id = ?, updated_at = ? WHERE id = ? AND table_id IS NULL AND kind = 'DINE_IN' AND status NOT IN ('COMPLETED', 'CANCELLED')",
    )
    .bind(table_id)
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

/// Clear the table binding (terminal transition or manual release)
pub async fn clear_table(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer_order SET table_id = NULL, updated_at = ? WHERE id = ? AND table_id IS NOT NULL",
    )
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}
