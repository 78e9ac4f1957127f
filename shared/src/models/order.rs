//! Order Model (dine-in subset)
//!
//! Only dine-in orders interact with the table pool; takeaway and
//! delivery orders pass through the same lifecycle without a binding.

use serde::{Deserialize, Serialize};

use super::TableLocation;

/// Order kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderKind {
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderKind::DineIn => "DINE_IN",
            OrderKind::Takeaway => "TAKEAWAY",
            OrderKind::Delivery => "DELIVERY",
        }
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// A bound order in one of these states makes its table `OCCUPIED`
    pub fn occupies_table(self) -> bool {
        matches!(
            self,
            OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready
        )
    }

    /// State machine: pending → confirmed → (preparing → ready →) completed.
    /// The kitchen stages are optional; cancelled is reachable from any
    /// non-terminal state.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Preparing)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Preparing, Ready)
                | (Preparing, Completed)
                | (Preparing, Cancelled)
                | (Ready, Completed)
                | (Ready, Cancelled)
        )
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Human-readable code, e.g. `ORD-250806-XK42`
    pub code: String,
    pub kind: OrderKind,
    /// Seating preference used when auto-assigning a table
    pub location: TableLocation,
    /// Item count maintained by the cart plumbing; drives the cover estimate
    pub item_count: i32,
    pub guest_count: Option<i32>,
    /// Weak reference into the table pool (dine-in only)
    pub table_id: Option<i64>,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn is_dine_in(&self) -> bool {
        self.kind == OrderKind::DineIn
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub kind: OrderKind,
    pub location: TableLocation,
    #[serde(default)]
    pub item_count: i32,
    pub guest_count: Option<i32>,
}
