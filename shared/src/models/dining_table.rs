//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table location (室内/室外)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TableLocation {
    Indoor,
    Outdoor,
}

impl TableLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            TableLocation::Indoor => "INDOOR",
            TableLocation::Outdoor => "OUTDOOR",
        }
    }
}

/// Derived table status.
///
/// Written only by the status synchronizer; `MAINTENANCE` is driven by the
/// explicit `maintenance` flag, everything else by the active bookings
/// bound to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

impl TableStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TableStatus::Available => "AVAILABLE",
            TableStatus::Occupied => "OCCUPIED",
            TableStatus::Reserved => "RESERVED",
            TableStatus::Maintenance => "MAINTENANCE",
        }
    }
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    /// Physical table number, unique within the restaurant
    pub number: i64,
    pub capacity: i32,
    pub location: TableLocation,
    pub location_detail: Option<String>,
    /// Explicit admin toggle, independent of bookings
    pub maintenance: bool,
    pub status: TableStatus,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i64,
    pub capacity: i32,
    pub location: TableLocation,
    pub location_detail: Option<String>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiningTableUpdate {
    pub capacity: Option<i32>,
    pub location: Option<TableLocation>,
    pub location_detail: Option<String>,
    pub is_active: Option<bool>,
}
