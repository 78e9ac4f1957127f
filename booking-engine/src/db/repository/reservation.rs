//! Reservation Repository

use shared::models::{Reservation, ReservationCreate, ReservationStatus};
use sqlx::{Sqlite, SqlitePool};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, code, customer_name, reserved_date, reserved_time, party_size, location, table_id, status, note, created_at, updated_at";

/// Find reservation by id
pub async fn find_by_id(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(reservation)
}

/// Find reservation by human-readable code
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation WHERE code = ? LIMIT 1"
    ))
    .bind(code.to_string())
    .fetch_optional(pool)
    .await?;
    Ok(reservation)
}

/// Create a new reservation (status PENDING, no table bound)
pub async fn create(
    pool: &SqlitePool,
    code: &str,
    data: ReservationCreate,
) -> RepoResult<Reservation> {
    if data.party_size < 1 {
        return Err(RepoError::Validation(format!(
            "Party size must be positive: {}",
            data.party_size
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO reservation (id, code, customer_name, reserved_date, reserved_time, party_size, location, table_id, status, note, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, NULL, 'PENDING', ?, ?, ?)",
    )
    .bind(id)
    .bind(code.to_string())
    .bind(data.customer_name)
    .bind(data.reserved_date)
    .bind(data.reserved_time)
    .bind(data.party_size)
    .bind(data.location)
    .bind(data.note)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))
}

/// Active (non-terminal) reservations bound to a table
pub async fn find_active_for_table(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    table_id: i64,
) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation WHERE table_id = ? AND status IN ('PENDING', 'CONFIRMED') ORDER BY reserved_date, reserved_time"
    ))
    .bind(table_id)
    .fetch_all(ex)
    .await?;
    Ok(reservations)
}

/// Active reservations bound to a specific table on a given date.
///
/// These are the exclusion windows the conflict calculator runs against.
pub async fn find_active_for_table_on_date(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    table_id: i64,
    date: &str,
) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation WHERE table_id = ? AND reserved_date = ? AND status IN ('PENDING', 'CONFIRMED') ORDER BY reserved_time"
    ))
    .bind(table_id)
    .bind(date.to_string())
    .fetch_all(ex)
    .await?;
    Ok(reservations)
}

/// All table-bound active reservations on a date (availability pre-pass)
pub async fn find_active_bound_on_date(
    pool: &SqlitePool,
    date: &str,
) -> RepoResult<Vec<Reservation>> {
    let reservations = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation WHERE reserved_date = ? AND table_id IS NOT NULL AND status IN ('PENDING', 'CONFIRMED')"
    ))
    .bind(date.to_string())
    .fetch_all(pool)
    .await?;
    Ok(reservations)
}

/// Optimistic status update: succeeds only from the expected prior status.
///
/// Returns 0 rows when another writer got there first.
pub async fn set_status(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
    from: ReservationStatus,
    to: ReservationStatus,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE reservation SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(now)
            .bind(id)
            .bind(from)
            .execute(ex)
            .await?;
    Ok(rows.rows_affected())
}

/// Bind a table. Set-once: fails (0 rows) if a binding already exists or
/// the reservation is no longer active.
pub async fn bind_table(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
    table_id: i64,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE reservation SET table_id = ?, updated_at = ? WHERE id = ? AND table_id IS NULL AND status IN ('PENDING', 'CONFIRMED')",
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
        "UPDATE reservation SET table_id = NULL, updated_at = ? WHERE id = ? AND table_id IS NOT NULL",
    )
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}
