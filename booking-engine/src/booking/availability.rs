//! Availability Resolver
//!
//! Enumerates candidate tables for a request and returns the best fit:
//! smallest sufficient capacity, then lowest table number. `Ok(None)` is
//! a normal outcome — the caller leaves the request unbound.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use shared::models::{DiningTable, TableLocation};
use validator::Validate;

use crate::booking::conflict::{self, BufferWindow};
use crate::core::{EngineConfig, EngineState};
use crate::db::repository;
use crate::utils::{BookingResult, time};

/// Allocation request.
///
/// `date`/`time` must be supplied together; when absent the request is an
/// immediate walk-in and only capacity/location/current-status are
/// checked.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FindTableQuery {
    pub location: TableLocation,
    #[validate(range(min = 1, message = "party size must be at least 1"))]
    pub party_size: i32,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl FindTableQuery {
    /// Walk-in request: seat now
    pub fn immediate(location: TableLocation, party_size: i32) -> Self {
        Self {
            location,
            party_size,
            date: None,
            time: None,
        }
    }

    /// Scheduled request for a date (`YYYY-MM-DD`) and time (`HH:MM`)
    pub fn scheduled(
        location: TableLocation,
        party_size: i32,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            location,
            party_size,
            date: Some(date.into()),
            time: Some(time.into()),
        }
    }

    /// Parse the scheduled slot, rejecting a one-sided date/time pair
    pub(crate) fn slot(&self) -> BookingResult<Option<(NaiveDate, NaiveTime)>> {
        match (self.date.as_deref(), self.time.as_deref()) {
            (None, None) => Ok(None),
            (Some(date), Some(t)) => Ok(Some((time::parse_date(date)?, time::parse_time(t)?))),
            _ => Err(crate::utils::BookingError::validation(
                "date and time must be provided together",
            )),
        }
    }
}

/// Find the best-fit available table for a request, or `None`
pub async fn find_table(
    state: &EngineState,
    query: &FindTableQuery,
) -> BookingResult<Option<DiningTable>> {
    query.validate()?;
    let slot = query.slot()?;

    let candidates = repository::dining_table::find_candidates(
        state.pool(),
        query.location,
        query.party_size,
        slot.is_none(),
    )
    .await?;

    let Some((date, time_of_day)) = slot else {
        return Ok(candidates.into_iter().next());
    };

    // Scheduled request: drop candidates whose active bookings on that
    // date collide with the requested window.
    let config = &state.config;
    let wanted = BufferWindow::around(
        date,
        time_of_day,
        config.conflict_buffer_minutes,
        config.timezone,
    );
    let date_str = date.format("%Y-%m-%d").to_string();
    let booked = repository::reservation::find_active_bound_on_date(state.pool(), &date_str).await?;

    for table in candidates {
        let taken = booked
            .iter()
            .filter(|r| r.table_id == Some(table.id))
            .filter_map(|r| reservation_window(&r.reserved_date, &r.reserved_time, config));
        if !conflict::conflicts_with_any(&wanted, taken) {
            return Ok(Some(table));
        }
    }
    Ok(None)
}

/// Re-validation used by the assignment service inside its transaction:
/// does the requested window collide with any active booking already on
/// this table?
pub(crate) async fn table_window_conflict(
    ex: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    config: &EngineConfig,
    table_id: i64,
    date: NaiveDate,
    time_of_day: NaiveTime,
) -> BookingResult<bool> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let existing =
        repository::reservation::find_active_for_table_on_date(ex, table_id, &date_str).await?;
    let wanted = BufferWindow::around(
        date,
        time_of_day,
        config.conflict_buffer_minutes,
        config.timezone,
    );
    let taken = existing
        .iter()
        .filter_map(|r| reservation_window(&r.reserved_date, &r.reserved_time, config));
    Ok(conflict::conflicts_with_any(&wanted, taken))
}

/// Window of a stored reservation; malformed rows are skipped (dates and
/// times are validated at creation)
pub(crate) fn reservation_window(
    date: &str,
    time_of_day: &str,
    config: &EngineConfig,
) -> Option<BufferWindow> {
    let date = time::parse_date(date).ok()?;
    let time_of_day = time::parse_time(time_of_day).ok()?;
    Some(BufferWindow::around(
        date,
        time_of_day,
        config.conflict_buffer_minutes,
        config.timezone,
    ))
}
