//! Booking domain - table allocation and status synchronization
//!
//! # 模块结构
//!
//! - [`conflict`] - 冲突窗口计算 (纯函数)
//! - [`availability`] - 可用桌台解析
//! - [`assignment`] - 桌台绑定/释放
//! - [`status_sync`] - 状态派生与生命周期流转
//! - [`sweeper`] - 周期性状态重算
//!
//! [`BookingEngine`] is the in-process surface controllers call.

pub mod assignment;
pub mod availability;
pub mod conflict;
pub mod status_sync;
pub mod sweeper;

#[cfg(test)]
mod tests;

use serde::Serialize;
use shared::models::{
    Actor, BookingKind, DiningTable, DiningTableCreate, DiningTableUpdate, Order, OrderCreate,
    OrderKind, OrderStatus, Reservation, ReservationCreate, ReservationStatus, StatusHistoryEntry,
    TableLocation, TableStatus,
};

pub use assignment::AssignmentService;
pub use availability::FindTableQuery;
pub use status_sync::{StatusSynchronizer, SyncOutcome, derive_table_status};
pub use sweeper::StatusSweepScheduler;

use crate::core::{EngineConfig, EngineState};
use crate::db::{DbService, repository};
use crate::utils::{BookingError, BookingResult, time};

/// Reference to the booking side of a table binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRef {
    Reservation(i64),
    Order(i64),
}

impl BookingRef {
    pub fn kind(self) -> BookingKind {
        match self {
            BookingRef::Reservation(_) => BookingKind::Reservation,
            BookingRef::Order(_) => BookingKind::Order,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            BookingRef::Reservation(id) | BookingRef::Order(id) => id,
        }
    }
}

/// Current occupant shown on dashboards
#[derive(Debug, Clone, Serialize)]
pub struct Occupant {
    pub kind: BookingKind,
    pub code: String,
    pub covers: i32,
    /// Scheduled time for reservations, absent for walk-in orders
    pub time: Option<String>,
}

/// Dashboard/reporting view of one table
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub number: i64,
    pub capacity: i32,
    pub location: TableLocation,
    pub location_detail: Option<String>,
    pub status: TableStatus,
    pub occupant: Option<Occupant>,
}

/// The engine facade consumed in-process by controllers.
///
/// Every state-changing call takes an explicit [`Actor`] for history
/// attribution.
#[derive(Clone)]
pub struct BookingEngine {
    state: EngineState,
    assignment: AssignmentService,
    synchronizer: StatusSynchronizer,
}

impl BookingEngine {
    /// Open the store at `config.db_path` and build the engine
    pub async fn open(config: EngineConfig) -> BookingResult<Self> {
        let db = DbService::new(&config.db_path).await?;
        Ok(Self::with_state(EngineState::new(config, db)))
    }

    pub fn with_state(state: EngineState) -> Self {
        Self {
            assignment: AssignmentService::new(state.clone()),
            synchronizer: StatusSynchronizer::new(state.clone()),
            state,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn assignment(&self) -> &AssignmentService {
        &self.assignment
    }

    pub fn synchronizer(&self) -> &StatusSynchronizer {
        &self.synchronizer
    }

    // ==================== Table pool administration ====================

    pub async fn create_table(&self, data: DiningTableCreate) -> BookingResult<DiningTable> {
        Ok(repository::dining_table::create(self.state.pool(), data).await?)
    }

    pub async fn update_table(
        &self,
        table_id: i64,
        data: DiningTableUpdate,
    ) -> BookingResult<DiningTable> {
        Ok(repository::dining_table::update(self.state.pool(), table_id, data).await?)
    }

    pub async fn list_tables(&self) -> BookingResult<Vec<DiningTable>> {
        Ok(repository::dining_table::find_all(self.state.pool()).await?)
    }

    /// Flip the explicit maintenance flag and re-derive the table
    pub async fn set_maintenance(&self, table_id: i64, on: bool) -> BookingResult<TableStatus> {
        let rows =
            repository::dining_table::set_maintenance(self.state.pool(), table_id, on).await?;
        if rows == 0 {
            return Err(BookingError::not_found(format!("Table {table_id}")));
        }
        Ok(self.synchronizer.sync_table(table_id).await?.status())
    }

    // ==================== Booking creation ====================

    /// Create a pending reservation with a generated code and an initial
    /// history entry
    pub async fn create_reservation(
        &self,
        data: ReservationCreate,
        actor: &Actor,
    ) -> BookingResult<Reservation> {
        if data.customer_name.trim().is_empty() {
            return Err(BookingError::validation("Customer name is required"));
        }
        time::parse_date(&data.reserved_date)?;
        time::parse_time(&data.reserved_time)?;
        if data.party_size < 1 {
            return Err(BookingError::validation(format!(
                "Party size must be positive: {}",
                data.party_size
            )));
        }

        let code = shared::util::booking_code("RSV");
        let reservation =
            repository::reservation::create(self.state.pool(), &code, data).await?;
        repository::status_history::append(
            self.state.pool(),
            BookingKind::Reservation,
            reservation.id,
            reservation.status.as_str(),
            actor,
            Some("reservation created"),
        )
        .await?;
        tracing::info!(code = %reservation.code, "Reservation created");
        Ok(reservation)
    }

    /// Create a pending order with a generated code and an initial
    /// history entry
    pub async fn create_order(&self, data: OrderCreate, actor: &Actor) -> BookingResult<Order> {
        let code = shared::util::booking_code("ORD");
        let order = repository::customer_order::create(self.state.pool(), &code, data).await?;
        repository::status_history::append(
            self.state.pool(),
            BookingKind::Order,
            order.id,
            order.status.as_str(),
            actor,
            Some("order created"),
        )
        .await?;
        tracing::info!(code = %order.code, kind = order.kind.as_str(), "Order created");
        Ok(order)
    }

    // ==================== Allocation ====================

    /// Find the best-fit table for a request; `None` is a normal outcome
    pub async fn find_table(&self, query: &FindTableQuery) -> BookingResult<Option<DiningTable>> {
        availability::find_table(&self.state, query).await
    }

    pub async fn assign(
        &self,
        target: BookingRef,
        table_id: i64,
        actor: &Actor,
    ) -> BookingResult<()> {
        self.assignment.assign(target, table_id, actor).await
    }

    pub async fn release(&self, target: BookingRef, actor: &Actor) -> BookingResult<()> {
        self.assignment.release(target, actor).await
    }

    // ==================== Lifecycle ====================

    /// Guarded reservation transition. Confirming an unbound reservation
    /// triggers auto-assignment; finding no table is non-fatal.
    pub async fn transition_reservation(
        &self,
        id: i64,
        new_status: ReservationStatus,
        actor: &Actor,
        note: Option<&str>,
    ) -> BookingResult<Reservation> {
        let reservation = self
            .synchronizer
            .transition_reservation(id, new_status, actor, note)
            .await?;
        if reservation.status == ReservationStatus::Confirmed && reservation.table_id.is_none() {
            self.auto_assign(BookingRef::Reservation(id), &reservation.code)
                .await;
            return repository::reservation::find_by_id(self.state.pool(), id)
                .await?
                .ok_or_else(|| BookingError::not_found(format!("Reservation {id}")));
        }
        Ok(reservation)
    }

    /// Guarded order transition. Confirming an unbound dine-in order
    /// triggers auto-assignment; finding no table is non-fatal.
    pub async fn transition_order(
        &self,
        id: i64,
        new_status: OrderStatus,
        actor: &Actor,
        note: Option<&str>,
    ) -> BookingResult<Order> {
        let order = self
            .synchronizer
            .transition_order(id, new_status, actor, note)
            .await?;
        if order.status == OrderStatus::Confirmed
            && order.kind == OrderKind::DineIn
            && order.table_id.is_none()
        {
            self.auto_assign(BookingRef::Order(id), &order.code).await;
            return repository::customer_order::find_by_id(self.state.pool(), id)
                .await?
                .ok_or_else(|| BookingError::not_found(format!("Order {id}")));
        }
        Ok(order)
    }

    async fn auto_assign(&self, target: BookingRef, code: &str) {
        match self
            .assignment
            .resolve_and_assign(target, &Actor::system())
            .await
        {
            Ok(Some(table)) => {
                tracing::info!(code = %code, table = table.number, "Auto-assigned table");
            }
            Ok(None) => {
                tracing::info!(code = %code, "No suitable table, booking proceeds unbound");
            }
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "Auto-assignment failed");
            }
        }
    }

    // ==================== Synchronization ====================

    pub async fn sync_table(&self, table_id: i64) -> BookingResult<SyncOutcome> {
        self.synchronizer.sync_table(table_id).await
    }

    pub async fn sync_all(&self) -> BookingResult<usize> {
        self.synchronizer.sync_all().await
    }

    // ==================== Views ====================

    /// Dashboard summary for one table
    pub async fn table_summary(&self, table_id: i64) -> BookingResult<TableSummary> {
        let pool = self.state.pool();
        let table = repository::dining_table::find_by_id(pool, table_id)
            .await?
            .ok_or_else(|| BookingError::not_found(format!("Table {table_id}")))?;
        let orders = repository::customer_order::find_active_for_table(pool, table_id).await?;
        let reservations = repository::reservation::find_active_for_table(pool, table_id).await?;
        Ok(self.build_summary(table, &orders, &reservations))
    }

    /// Dashboard summaries for the whole pool
    pub async fn list_summaries(&self) -> BookingResult<Vec<TableSummary>> {
        let pool = self.state.pool();
        let tables = repository::dining_table::find_all(pool).await?;
        let mut summaries = Vec::with_capacity(tables.len());
        for table in tables {
            let orders =
                repository::customer_order::find_active_for_table(pool, table.id).await?;
            let reservations =
                repository::reservation::find_active_for_table(pool, table.id).await?;
            summaries.push(self.build_summary(table, &orders, &reservations));
        }
        Ok(summaries)
    }

    /// Ordered audit trail for a reservation or order
    pub async fn status_history(
        &self,
        target: BookingRef,
    ) -> BookingResult<Vec<StatusHistoryEntry>> {
        Ok(repository::status_history::find_for(self.state.pool(), target.kind(), target.id())
            .await?)
    }

    fn build_summary(
        &self,
        table: DiningTable,
        orders: &[Order],
        reservations: &[Reservation],
    ) -> TableSummary {
        let config = &self.state.config;
        let now = shared::util::now_millis();

        // Occupying order wins; otherwise the confirmed reservation whose
        // window is current or next up today.
        let occupant = orders
            .iter()
            .find(|o| o.status.occupies_table())
            .map(|o| Occupant {
                kind: BookingKind::Order,
                code: o.code.clone(),
                covers: assignment::estimate_order_covers(o, config),
                time: None,
            })
            .or_else(|| {
                reservations
                    .iter()
                    .filter(|r| r.status == ReservationStatus::Confirmed)
                    .filter_map(|r| {
                        availability::reservation_window(
                            &r.reserved_date,
                            &r.reserved_time,
                            config,
                        )
                        .filter(|w| w.end >= now)
                        .map(|w| (r, w))
                    })
                    .min_by_key(|(_, w)| w.start)
                    .map(|(r, _)| Occupant {
                        kind: BookingKind::Reservation,
                        code: r.code.clone(),
                        covers: r.party_size,
                        time: Some(format!("{} {}", r.reserved_date, r.reserved_time)),
                    })
            });

        TableSummary {
            number: table.number,
            capacity: table.capacity,
            location: table.location,
            location_detail: table.location_detail,
            status: table.status,
            occupant,
        }
    }
}
