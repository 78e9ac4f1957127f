use chrono::Timelike;
use chrono_tz::Tz;
use shared::models::*;
use tempfile::TempDir;

use super::*;
use crate::core::{EngineConfig, EngineState};
use crate::db::DbService;

mod test_assignment;
mod test_transitions;


// ========================================================================
// Engine fixture
// ========================================================================

pub(crate) struct TestCtx {
    pub engine: BookingEngine,
    _tmp: TempDir,
}

pub(crate) async fn setup() -> TestCtx {
    setup_with(|_| {}).await
}

pub(crate) async fn setup_with(tweak: impl FnOnce(&mut EngineConfig)) -> TestCtx {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("booking.db");
    let mut config = test_config(test_timezone());
    config.db_path = db_path.to_string_lossy().into_owned();
    tweak(&mut config);

    let db = DbService::new(&config.db_path).await.unwrap();
    let engine = BookingEngine::with_state(EngineState::new(config, db));
    TestCtx { engine, _tmp: tmp }
}

pub(crate) fn test_config(tz: Tz) -> EngineConfig {
    EngineConfig {
        db_path: "booking.db".to_string(),
        timezone: tz,
        conflict_buffer_minutes: 120,
        cancel_lead_minutes: 120,
        dinein_min_covers: 2,
        dinein_max_covers: 4,
        sweep_interval_secs: 60,
        log_dir: None,
    }
}

/// Fixed-offset zone where the local clock currently reads ~09:00, so
/// same-day slots a few hours out never cross midnight during a test run.
pub(crate) fn test_timezone() -> Tz {
    let utc_hour = chrono::Utc::now().hour() as i32;
    let mut offset = utc_hour - 9;
    if offset > 12 {
        offset -= 24;
    }
    // POSIX-style sign: Etc/GMT+5 is UTC-5
    let name = if offset >= 0 {
        format!("Etc/GMT+{offset}")
    } else {
        format!("Etc/GMT{offset}")
    };
    name.parse().unwrap()
}

/// Local date/time strings `hours` from now in the given zone
pub(crate) fn slot_in_hours(tz: Tz, hours: i64) -> (String, String) {
    let at = chrono::Utc::now().with_timezone(&tz) + chrono::Duration::hours(hours);
    (at.format("%Y-%m-%d").to_string(), at.format("%H:%M").to_string())
}

pub(crate) fn staff() -> Actor {
    Actor::staff(7, "Alice")
}


// ========================================================================
// Entity helpers
// ========================================================================

pub(crate) async fn add_table(
    ctx: &TestCtx,
    number: i64,
    capacity: i32,
    location: TableLocation,
) -> DiningTable {
    ctx.engine
        .create_table(DiningTableCreate {
            number,
            capacity,
            location,
            location_detail: None,
        })
        .await
        .unwrap()
}

pub(crate) async fn make_reservation(
    ctx: &TestCtx,
    party_size: i32,
    location: TableLocation,
    date: &str,
    time: &str,
) -> Reservation {
    ctx.engine
        .create_reservation(
            ReservationCreate {
                customer_name: "Walter".to_string(),
                reserved_date: date.to_string(),
                reserved_time: time.to_string(),
                party_size,
                location,
                note: None,
            },
            &staff(),
        )
        .await
        .unwrap()
}

pub(crate) async fn make_order(
    ctx: &TestCtx,
    kind: OrderKind,
    item_count: i32,
    guest_count: Option<i32>,
) -> Order {
    ctx.engine
        .create_order(
            OrderCreate {
                kind,
                location: TableLocation::Indoor,
                item_count,
                guest_count,
            },
            &staff(),
        )
        .await
        .unwrap()
}


// ========================================================================
// In-memory fixtures for the pure derivation function
// ========================================================================

pub(crate) fn reservation_fixture(
    status: ReservationStatus,
    date: &str,
    time: &str,
) -> Reservation {
    Reservation {
        id: 1,
        code: "RSV-TEST".to_string(),
        customer_name: "Walter".to_string(),
        reserved_date: date.to_string(),
        reserved_time: time.to_string(),
        party_size: 2,
        location: TableLocation::Indoor,
        table_id: Some(1),
        status,
        note: None,
        created_at: 0,
        updated_at: 0,
    }
}

pub(crate) fn order_fixture(status: OrderStatus) -> Order {
    Order {
        id: 1,
        code: "ORD-TEST".to_string(),
        kind: OrderKind::DineIn,
        location: TableLocation::Indoor,
        item_count: 3,
        guest_count: None,
        table_id: Some(1),
        status,
        created_at: 0,
        updated_at: 0,
    }
}
