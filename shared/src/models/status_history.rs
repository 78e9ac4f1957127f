//! Status History Model
//!
//! Append-only transition log owned by the reservation or order it
//! documents. Entries are never mutated or deleted; tables carry no
//! history of their own.

use serde::{Deserialize, Serialize};

use super::{Actor, ActorRole};

/// Which entity a history entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BookingKind {
    Reservation,
    Order,
}

impl BookingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingKind::Reservation => "RESERVATION",
            BookingKind::Order => "ORDER",
        }
    }
}

/// One immutable status transition record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub parent_kind: BookingKind,
    pub parent_id: i64,
    /// Recorded status text, e.g. `CONFIRMED`
    pub status: String,
    pub actor_id: i64,
    pub actor_name: String,
    pub actor_role: ActorRole,
    pub note: Option<String>,
    pub created_at: i64,
}

impl StatusHistoryEntry {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.actor_id,
            name: self.actor_name.clone(),
            role: self.actor_role,
        }
    }
}
