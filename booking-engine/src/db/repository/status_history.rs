//! Status History Repository
//!
//! Append-only: entries are inserted, never updated or deleted.

use shared::models::{Actor, BookingKind, StatusHistoryEntry};
use sqlx::Sqlite;

use super::RepoResult;

/// Append one transition record.
///
/// The id is the rowid, so the log's order is exactly insertion order
/// even when two entries land in the same millisecond.
pub async fn append(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    kind: BookingKind,
    parent_id: i64,
    status: &str,
    actor: &Actor,
    note: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO status_history (parent_kind, parent_id, status, actor_id, actor_name, actor_role, note, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(kind)
    .bind(parent_id)
    .bind(status.to_string())
    .bind(actor.id)
    .bind(actor.name.clone())
    .bind(actor.role)
    .bind(note.map(|n| n.to_string()))
    .bind(now)
    .execute(ex)
    .await?;
    Ok(())
}

/// Ordered transition log for one reservation or order
pub async fn find_for(
    ex: impl sqlx::Executor<'_, Database = Sqlite>,
    kind: BookingKind,
    parent_id: i64,
) -> RepoResult<Vec<StatusHistoryEntry>> {
    let entries = sqlx::query_as::<_, StatusHistoryEntry>(
        "SELECT id, parent_kind, parent_id, status, actor_id, actor_name, actor_role, note, created_at FROM status_history WHERE parent_kind = ? AND parent_id = ? ORDER BY id",
    )
    .bind(kind)
    .bind(parent_id)
    .fetch_all(ex)
    .await?;
    Ok(entries)
}
