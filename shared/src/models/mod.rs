//! Domain models shared between the booking engine and its callers

pub mod actor;
pub mod dining_table;
pub mod order;
pub mod reservation;
pub mod status_history;

pub use actor::{Actor, ActorRole};
pub use dining_table::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableLocation, TableStatus,
};
pub use order::{Order, OrderCreate, OrderKind, OrderStatus};
pub use reservation::{Reservation, ReservationCreate, ReservationStatus};
pub use status_history::{BookingKind, StatusHistoryEntry};
