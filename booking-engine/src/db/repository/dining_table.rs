//! Dining Table Repository

use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableLocation, TableStatus};
use sqlx::{Sqlite, SqlitePool};

use super::{RepoError, RepoResult};

/// Find all active dining tables
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, location, location_detail, maintenance, status, is_active, created_at, updated_at FROM dining_table WHERE is_active = 1 ORDER BY number",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

/// Find table by id
pub async fn find_by_id(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, location, location_detail, maintenance, status, is_active, created_at, updated_at FROM dining_table WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(table)
}

/// Find table by physical number
pub async fn find_by_number(pool: &SqlitePool, number: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, number, capacity, location, location_detail, maintenance, status, is_active, created_at, updated_at FROM dining_table WHERE number = ? LIMIT 1",
    )
    .bind(number)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

/// Candidate tables for an allocation request.
///
/// Ranking is part of the contract: capacity ascending (minimize wasted
/// seats), then table number ascending for a reproducible tie-break.
/// `only_available` applies the current-status pre-filter used for
/// immediate (walk-in) requests; scheduled requests skip it because a
/// table reserved for an earlier slot can still take a later one.
pub async fn find_candidates(
    pool: &SqlitePool,
    location: TableLocation,
    min_capacity: i32,
    only_available: bool,
) -> RepoResult<Vec<DiningTable>> {
    let sql = if only_available {
        "SELECT id, number, capacity, location, location_detail, maintenance, status, is_active, created_at, updated_at FROM dining_table WHERE is_active = 1 AND location = ? AND capacity >= ? AND status = 'AVAILABLE' ORDER BY capacity, number"
    } else {
        "SELECT id, number, capacity, location, location_detail, maintenance, status, is_active, created_at, updated_at FROM dining_table WHERE is_active = 1 AND location = ? AND capacity >= ? ORDER BY capacity, number"
    };
    let tables = sqlx::query_as::<_, DiningTable>(sql)
        .bind(location)
        .bind(min_capacity)
        .fetch_all(pool)
        .await?;
    Ok(tables)
}

/// Create a new dining table
pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    if data.number < 1 {
        return Err(RepoError::Validation(format!(
            "Table number must be positive: {}",
            data.number
        )));
    }
    if data.capacity < 1 {
        return Err(RepoError::Validation(format!(
            "Table capacity must be positive: {}",
            data.capacity
        )));
    }
    if find_by_number(pool, data.number).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Table {} already exists",
            data.number
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO dining_table (id, number, capacity, location, location_detail, maintenance, status, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, 'AVAILABLE', 1, ?, ?)",
    )
    .bind(id)
    .bind(data.number)
    .bind(data.capacity)
    .bind(data.location)
    .bind(data.location_detail)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

/// Update a dining table (admin operation; does not touch derived status)
pub async fn update(pool: &SqlitePool, id: i64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
    if let Some(capacity) = data.capacity
        && capacity < 1
    {
        return Err(RepoError::Validation(format!(
            "Table capacity must be positive: {capacity}"
        )));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET capacity = COALESCE(?1, capacity), location = COALESCE(?2, location), location_detail = COALESCE(?3, location_detail), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.capacity)
    .bind(data.location)
    .bind(data.location_detail)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

/// Flip the explicit maintenance flag (status is re-derived separately)
pub async fn set_maintenance(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
    on: bool,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE dining_table SET maintenance = ?, updated_at = ? WHERE id = ?")
        .bind(on)
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected())
}

/// Persist a derived status, only if it differs from the stored value.
///
/// Returns the number of affected rows: 0 means the status was already
/// current and no write happened.
pub async fn set_status(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
    status: TableStatus,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status <> ?1",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}
