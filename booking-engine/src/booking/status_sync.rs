//! Status Synchronizer
//!
//! A table's status is a pure function of the active bookings bound to
//! it — it is re-derived from scratch at every trigger point, never
//! patched incrementally, so repeated runs are idempotent. Status is
//! persisted only when it differs from the stored value.
//!
//! Derivation order (first match wins):
//! 1. `MAINTENANCE` — explicit admin flag, independent of bookings
//! 2. `OCCUPIED` — a bound order in CONFIRMED/PREPARING/READY
//! 3. `OCCUPIED` — a confirmed reservation whose buffer window contains now
//! 4. `RESERVED` — a confirmed reservation with a future window today
//! 5. `AVAILABLE`

use shared::models::{
    Actor, ActorRole, BookingKind, Order, OrderStatus, Reservation, ReservationStatus, TableStatus,
};
use sqlx::SqliteConnection;

use crate::booking::availability;
use crate::core::{EngineConfig, EngineState};
use crate::db::repository;
use crate::utils::{BookingError, BookingResult, time};

/// Result of one derivation-and-persist step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Stored status already matched the derivation; no write happened
    Unchanged(TableStatus),
    Updated(TableStatus),
}

impl SyncOutcome {
    pub fn status(self) -> TableStatus {
        match self {
            SyncOutcome::Unchanged(s) | SyncOutcome::Updated(s) => s,
        }
    }

    pub fn changed(self) -> bool {
        matches!(self, SyncOutcome::Updated(_))
    }
}

/// Derive a table's status from its active bookings. Pure.
pub fn derive_table_status(
    maintenance: bool,
    orders: &[Order],
    reservations: &[Reservation],
    now_millis: i64,
    config: &EngineConfig,
) -> TableStatus {
    if maintenance {
        return TableStatus::Maintenance;
    }
    if orders.iter().any(|o| o.status.occupies_table()) {
        return TableStatus::Occupied;
    }

    let today = time::local_date(now_millis, config.timezone);
    let mut future_window_today = false;
    for reservation in reservations {
        if reservation.status != ReservationStatus::Confirmed {
            continue;
        }
        let Some(window) = availability::reservation_window(
            &reservation.reserved_date,
            &reservation.reserved_time,
            config,
        ) else {
            continue;
        };
        if window.contains(now_millis) {
            return TableStatus::Occupied;
        }
        if window.start > now_millis
            && time::parse_date(&reservation.reserved_date).is_ok_and(|d| d == today)
        {
            future_window_today = true;
        }
    }
    if future_window_today {
        return TableStatus::Reserved;
    }
    TableStatus::Available
}

/// Re-derive and persist one table's status on an existing connection.
///
/// Callers inside a transaction pass `&mut *tx` so the derivation commits
/// or rolls back with the writes that triggered it.
pub async fn sync_table_with(
    conn: &mut SqliteConnection,
    config: &EngineConfig,
    table_id: i64,
) -> BookingResult<SyncOutcome> {
    let table = repository::dining_table::find_by_id(&mut *conn, table_id)
        .await?
        .ok_or_else(|| BookingError::not_found(format!("Table {table_id}")))?;
    let orders = repository::customer_order::find_active_for_table(&mut *conn, table_id).await?;
    let reservations = repository::reservation::find_active_for_table(&mut *conn, table_id).await?;

    let status = derive_table_status(
        table.maintenance,
        &orders,
        &reservations,
        shared::util::now_millis(),
        config,
    );
    let rows = repository::dining_table::set_status(&mut *conn, table_id, status).await?;
    if rows > 0 {
        tracing::info!(
            table = table.number,
            from = table.status.as_str(),
            to = status.as_str(),
            "Table status updated"
        );
        Ok(SyncOutcome::Updated(status))
    } else {
        Ok(SyncOutcome::Unchanged(status))
    }
}

/// Status synchronizer service
#[derive(Clone)]
pub struct StatusSynchronizer {
    state: EngineState,
}

impl StatusSynchronizer {
    pub fn new(state: EngineState) -> Self {
        Self { state }
    }

    /// Re-derive one table's status
    pub async fn sync_table(&self, table_id: i64) -> BookingResult<SyncOutcome> {
        let mut conn = self
            .state
            .pool()
            .acquire()
            .await
            .map_err(repository::RepoError::from)?;
        sync_table_with(&mut conn, &self.state.config, table_id).await
    }

    /// Re-derive every active table; returns how many changed status.
    ///
    /// Used by the periodic sweep to catch time-window transitions (a
    /// reservation's window starting or lapsing) without an explicit
    /// event.
    pub async fn sync_all(&self) -> BookingResult<usize> {
        let tables = repository::dining_table::find_all(self.state.pool()).await?;
        let mut changed = 0;
        for table in &tables {
            if self.sync_table(table.id).await?.changed() {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Apply a guarded status transition to a reservation.
    ///
    /// On entering a terminal state the table binding is cleared and the
    /// table re-derived within the same transaction.
    pub async fn transition_reservation(
        &self,
        id: i64,
        new_status: ReservationStatus,
        actor: &Actor,
        note: Option<&str>,
    ) -> BookingResult<Reservation> {
        let pool = self.state.pool();
        let reservation = repository::reservation::find_by_id(pool, id)
            .await?
            .ok_or_else(|| BookingError::not_found(format!("Reservation {id}")))?;
        let current = reservation.status;

        if !current.can_transition_to(new_status) {
            return Err(BookingError::invalid_transition(format!(
                "{} cannot move from {} to {}",
                reservation.code,
                current.as_str(),
                new_status.as_str()
            )));
        }
        if actor.role == ActorRole::Customer && new_status == ReservationStatus::Cancelled {
            self.check_cancel_lead(&reservation)?;
        }

        let mut tx = pool.begin().await.map_err(repository::RepoError::from)?;
        let rows = repository::reservation::set_status(&mut *tx, id, current, new_status).await?;
        if rows == 0 {
            return Err(BookingError::Conflict(format!(
                "reservation {} was updated concurrently",
                reservation.code
            )));
        }
        repository::status_history::append(
            &mut *tx,
            BookingKind::Reservation,
            id,
            new_status.as_str(),
            actor,
            note,
        )
        .await?;
        if let Some(table_id) = reservation.table_id {
            if new_status.is_terminal() {
                repository::reservation::clear_table(&mut *tx, id).await?;
            }
            sync_table_with(&mut tx, &self.state.config, table_id).await?;
        }
        tx.commit().await.map_err(repository::RepoError::from)?;

        tracing::info!(
            code = %reservation.code,
            from = current.as_str(),
            to = new_status.as_str(),
            actor = %actor.name,
            "Reservation status changed"
        );
        repository::reservation::find_by_id(pool, id)
            .await?
            .ok_or_else(|| BookingError::not_found(format!("Reservation {id}")))
    }

    /// Apply a guarded status transition to an order
    pub async fn transition_order(
        &self,
        id: i64,
        new_status: OrderStatus,
        actor: &Actor,
        note: Option<&str>,
    ) -> BookingResult<Order> {
        let pool = self.state.pool();
        let order = repository::customer_order::find_by_id(pool, id)
            .await?
            .ok_or_else(|| BookingError::not_found(format!("Order {id}")))?;
        let current = order.status;

        if !current.can_transition_to(new_status) {
            return Err(BookingError::invalid_transition(format!(
                "{} cannot move from {} to {}",
                order.code,
                current.as_str(),
                new_status.as_str()
            )));
        }
        // No scheduled window to measure a cancellation lead against:
        // once the kitchen may have started, cancellation is staff-only.
        if actor.role == ActorRole::Customer
            && new_status == OrderStatus::Cancelled
            && current != OrderStatus::Pending
        {
            return Err(BookingError::invalid_transition(format!(
                "{} is already being prepared and can only be cancelled by staff",
                order.code
            )));
        }

        let mut tx = pool.begin().await.map_err(repository::RepoError::from)?;
        let rows = repository::customer_order::set_status(&mut *tx, id, current, new_status).await?;
        if rows == 0 {
            return Err(BookingError::Conflict(format!(
                "order {} was updated concurrently",
                order.code
            )));
        }
        repository::status_history::append(
            &mut *tx,
            BookingKind::Order,
            id,
            new_status.as_str(),
            actor,
            note,
        )
        .await?;
        if let Some(table_id) = order.table_id {
            if new_status.is_terminal() {
                repository::customer_order::clear_table(&mut *tx, id).await?;
            }
            sync_table_with(&mut tx, &self.state.config, table_id).await?;
        }
        tx.commit().await.map_err(repository::RepoError::from)?;

        tracing::info!(
            code = %order.code,
            from = current.as_str(),
            to = new_status.as_str(),
            actor = %actor.name,
            "Order status changed"
        );
        repository::customer_order::find_by_id(pool, id)
            .await?
            .ok_or_else(|| BookingError::not_found(format!("Order {id}")))
    }

    /// Customer self-service cancellation must happen more than the
    /// configured lead time before the scheduled slot
    fn check_cancel_lead(&self, reservation: &Reservation) -> BookingResult<()> {
        let config = &self.state.config;
        let date = time::parse_date(&reservation.reserved_date)?;
        let time_of_day = time::parse_time(&reservation.reserved_time)?;
        let scheduled_at = time::date_time_to_millis(date, time_of_day, config.timezone);
        let lead_ms = config.cancel_lead_minutes * 60_000;
        if scheduled_at - shared::util::now_millis() <= lead_ms {
            return Err(BookingError::invalid_transition(format!(
                "{} is within {} minutes of its slot; please contact staff to cancel",
                reservation.code, config.cancel_lead_minutes
            )));
        }
        Ok(())
    }
}
