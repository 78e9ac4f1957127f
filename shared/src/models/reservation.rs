//! Reservation Model

use serde::{Deserialize, Serialize};

use super::TableLocation;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Completed => "COMPLETED",
            ReservationStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states accept no further transitions and release the table
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled
        )
    }

    /// State machine: pending → confirmed → completed, cancelled from any
    /// non-terminal state.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    /// Human-readable code, e.g. `RSV-250806-7GXK`
    pub code: String,
    pub customer_name: String,
    /// Requested date, `YYYY-MM-DD` in the business timezone
    pub reserved_date: String,
    /// Requested time, `HH:MM` in the business timezone
    pub reserved_time: String,
    pub party_size: i32,
    pub location: TableLocation,
    /// Weak reference into the table pool; set once by the assignment
    /// service, cleared when the reservation reaches a terminal state
    pub table_id: Option<i64>,
    pub status: ReservationStatus,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    /// Active bookings hold their slot for conflict purposes
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub customer_name: String,
    pub reserved_date: String,
    pub reserved_time: String,
    pub party_size: i32,
    pub location: TableLocation,
    pub note: Option<String>,
}
