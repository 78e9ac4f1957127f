//! booking-engine — table allocation & status synchronization
//!
//! Matches physical tables to reservations and dine-in orders under
//! capacity, location, and time-conflict constraints, and keeps table,
//! reservation, and order status fields mutually consistent as those
//! entities move through their lifecycles.
//!
//! Consumed in-process: controllers create bookings and call
//! [`BookingEngine`] for allocation, status transitions, summaries, and
//! audit history. There is no wire protocol in this crate.

pub mod booking;
pub mod core;
pub mod db;
pub mod utils;

pub use booking::{
    AssignmentService, BookingEngine, BookingRef, FindTableQuery, Occupant, StatusSweepScheduler,
    StatusSynchronizer, SyncOutcome, TableSummary,
};
pub use core::{EngineConfig, EngineState};
pub use db::DbService;
pub use utils::{BookingError, BookingResult, RejectReason};
