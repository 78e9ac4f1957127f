//! Actor Model
//!
//! Every state-changing engine call takes an explicit actor for history
//! attribution. There is no ambient "current user" lookup.

use serde::{Deserialize, Serialize};

/// Role of the actor performing a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ActorRole {
    Customer,
    Staff,
    System,
}

impl ActorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ActorRole::Customer => "CUSTOMER",
            ActorRole::Staff => "STAFF",
            ActorRole::System => "SYSTEM",
        }
    }
}

/// Actor identity (id, display name, role)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn customer(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: ActorRole::Customer,
        }
    }

    pub fn staff(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: ActorRole::Staff,
        }
    }

    /// System actor for automatic changes (auto-assignment, periodic sweep)
    pub fn system() -> Self {
        Self {
            id: 0,
            name: "system".to_string(),
            role: ActorRole::System,
        }
    }
}
