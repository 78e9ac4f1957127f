//! Table Assignment Service
//!
//! Binds tables to reservations and dine-in orders. The "re-validate,
//! then bind" step runs inside a per-table critical section and a single
//! transaction, so two concurrent requests for the same table and an
//! overlapping window can never both succeed. Preconditions are checked
//! here even when the caller just ran the resolver — the resolver's
//! answer may be stale by the time we bind.

use chrono::{NaiveDate, NaiveTime};
use shared::models::{Actor, DiningTable, Order, TableLocation};
use sqlx::SqlitePool;

use crate::booking::{BookingRef, availability, status_sync};
use crate::booking::availability::FindTableQuery;
use crate::core::{EngineConfig, EngineState};
use crate::db::repository::{self, RepoError};
use crate::utils::{BookingError, BookingResult, RejectReason, time};

/// What an assignment request needs from a table
struct RequestProfile {
    covers: i32,
    location: TableLocation,
    slot: Option<(NaiveDate, NaiveTime)>,
    status_text: &'static str,
}

/// Table assignment service
#[derive(Clone)]
pub struct AssignmentService {
    state: EngineState,
}

impl AssignmentService {
    pub fn new(state: EngineState) -> Self {
        Self { state }
    }

    /// Bind `table_id` to the given reservation or order.
    ///
    /// Typed rejections: `capacity_exceeded`, `location_mismatch`,
    /// `time_conflict`, `table_inactive`. A `Conflict` error means a
    /// concurrent binding won the race and the call may be retried.
    pub async fn assign(
        &self,
        target: BookingRef,
        table_id: i64,
        actor: &Actor,
    ) -> BookingResult<()> {
        let lock = self.state.table_lock(table_id);
        let _guard = lock.lock().await;

        let pool = self.state.pool();
        let config = &self.state.config;

        let table = repository::dining_table::find_by_id(pool, table_id)
            .await?
            .ok_or_else(|| BookingError::not_found(format!("Table {table_id}")))?;
        if !table.is_active {
            return Err(BookingError::Rejected(RejectReason::TableInactive));
        }

        let profile = self.load_profile(pool, target, config).await?;
        if profile.covers > table.capacity {
            return Err(BookingError::Rejected(RejectReason::CapacityExceeded));
        }
        if profile.location != table.location {
            return Err(BookingError::Rejected(RejectReason::LocationMismatch));
        }

        let mut tx = pool.begin().await.map_err(RepoError::from)?;
        if let Some((date, time_of_day)) = profile.slot {
            let conflict =
                availability::table_window_conflict(&mut *tx, config, table_id, date, time_of_day)
                    .await?;
            if conflict {
                return Err(BookingError::Rejected(RejectReason::TimeConflict));
            }
        }

        let rows = match target {
            BookingRef::Reservation(id) => {
                repository::reservation::bind_table(&mut *tx, id, table_id).await?
            }
            BookingRef::Order(id) => {
                repository::customer_order::bind_table(&mut *tx, id, table_id).await?
            }
        };
        if rows == 0 {
            // Lost a race on the booking itself (bound or terminal meanwhile)
            return Err(BookingError::Conflict(format!(
                "booking was bound or closed concurrently (table {})",
                table.number
            )));
        }

        repository::status_history::append(
            &mut *tx,
            target.kind(),
            target.id(),
            profile.status_text,
            actor,
            Some(&format!("assigned to table {}", table.number)),
        )
        .await?;
        status_sync::sync_table_with(&mut tx, config, table_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            table = table.number,
            target = ?target,
            actor = %actor.name,
            "Table assigned"
        );
        Ok(())
    }

    /// Clear the booking's table binding and re-derive the freed table.
    ///
    /// Releasing an unbound booking is a no-op.
    pub async fn release(&self, target: BookingRef, actor: &Actor) -> BookingResult<()> {
        let pool = self.state.pool();
        let config = &self.state.config;

        let (bound_table, status_text) = match target {
            BookingRef::Reservation(id) => {
                let r = repository::reservation::find_by_id(pool, id)
                    .await?
                    .ok_or_else(|| BookingError::not_found(format!("Reservation {id}")))?;
                (r.table_id, r.status.as_str())
            }
            BookingRef::Order(id) => {
                let o = repository::customer_order::find_by_id(pool, id)
                    .await?
                    .ok_or_else(|| BookingError::not_found(format!("Order {id}")))?;
                (o.table_id, o.status.as_str())
            }
        };
        let Some(table_id) = bound_table else {
            return Ok(());
        };

        let lock = self.state.table_lock(table_id);
        let _guard = lock.lock().await;

        let table_number = repository::dining_table::find_by_id(pool, table_id)
            .await?
            .map(|t| t.number)
            .unwrap_or(table_id);

        let mut tx = pool.begin().await.map_err(RepoError::from)?;
        let rows = match target {
            BookingRef::Reservation(id) => {
                repository::reservation::clear_table(&mut *tx, id).await?
            }
            BookingRef::Order(id) => repository::customer_order::clear_table(&mut *tx, id).await?,
        };
        if rows > 0 {
            repository::status_history::append(
                &mut *tx,
                target.kind(),
                target.id(),
                status_text,
                actor,
                Some(&format!("released table {table_number}")),
            )
            .await?;
        }
        status_sync::sync_table_with(&mut tx, config, table_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(table = table_number, target = ?target, "Table released");
        Ok(())
    }

    /// Auto-assignment: resolve a table for the booking and bind it,
    /// retrying once after a lost race. No table found is non-fatal —
    /// the booking proceeds unbound and can be assigned later.
    pub async fn resolve_and_assign(
        &self,
        target: BookingRef,
        actor: &Actor,
    ) -> BookingResult<Option<DiningTable>> {
        let query = self.query_for(target).await?;
        let mut retried = false;
        loop {
            let Some(table) = availability::find_table(&self.state, &query).await? else {
                return Ok(None);
            };
            match self.assign(target, table.id, actor).await {
                Ok(()) => return Ok(Some(table)),
                Err(e) if e.is_retryable() && !retried => {
                    tracing::debug!(table = table.number, error = %e, "Assignment race lost, retrying");
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Build the resolver query matching a booking's requirements
    async fn query_for(&self, target: BookingRef) -> BookingResult<FindTableQuery> {
        let pool = self.state.pool();
        match target {
            BookingRef::Reservation(id) => {
                let r = repository::reservation::find_by_id(pool, id)
                    .await?
                    .ok_or_else(|| BookingError::not_found(format!("Reservation {id}")))?;
                Ok(FindTableQuery::scheduled(
                    r.location,
                    r.party_size,
                    r.reserved_date,
                    r.reserved_time,
                ))
            }
            BookingRef::Order(id) => {
                let o = repository::customer_order::find_by_id(pool, id)
                    .await?
                    .ok_or_else(|| BookingError::not_found(format!("Order {id}")))?;
                if !o.is_dine_in() {
                    return Err(BookingError::validation(format!(
                        "{} is not a dine-in order",
                        o.code
                    )));
                }
                Ok(FindTableQuery::immediate(
                    o.location,
                    estimate_order_covers(&o, &self.state.config),
                ))
            }
        }
    }

    async fn load_profile(
        &self,
        pool: &SqlitePool,
        target: BookingRef,
        config: &EngineConfig,
    ) -> BookingResult<RequestProfile> {
        match target {
            BookingRef::Reservation(id) => {
                let r = repository::reservation::find_by_id(pool, id)
                    .await?
                    .ok_or_else(|| BookingError::not_found(format!("Reservation {id}")))?;
                if !r.is_active() {
                    return Err(BookingError::validation(format!(
                        "{} is no longer active",
                        r.code
                    )));
                }
                if r.table_id.is_some() {
                    return Err(BookingError::validation(format!(
                        "{} already has a table; release it first",
                        r.code
                    )));
                }
                let date = time::parse_date(&r.reserved_date)?;
                let time_of_day = time::parse_time(&r.reserved_time)?;
                Ok(RequestProfile {
                    covers: r.party_size,
                    location: r.location,
                    slot: Some((date, time_of_day)),
                    status_text: r.status.as_str(),
                })
            }
            BookingRef::Order(id) => {
                let o = repository::customer_order::find_by_id(pool, id)
                    .await?
                    .ok_or_else(|| BookingError::not_found(format!("Order {id}")))?;
                if !o.is_dine_in() {
                    return Err(BookingError::validation(format!(
                        "{} is not a dine-in order",
                        o.code
                    )));
                }
                if !o.is_active() {
                    return Err(BookingError::validation(format!(
                        "{} is no longer active",
                        o.code
                    )));
                }
                if o.table_id.is_some() {
                    return Err(BookingError::validation(format!(
                        "{} already has a table; release it first",
                        o.code
                    )));
                }
                Ok(RequestProfile {
                    covers: estimate_order_covers(&o, config),
                    location: o.location,
                    slot: None,
                    status_text: o.status.as_str(),
                })
            }
        }
    }
}

/// Covers needed by a dine-in order: the stated guest count when known,
/// otherwise the item count clamped into the configured bounds
pub(crate) fn estimate_order_covers(order: &Order, config: &EngineConfig) -> i32 {
    order
        .guest_count
        .unwrap_or_else(|| order.item_count.clamp(config.dinein_min_covers, config.dinein_max_covers))
}
