//! Lunch domain: menu items, orders, and per-student preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::ids::{LunchOrderId, MenuItemId, StudentId};
use super::money::Amount;

/// A dish offered by the canteen.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: Amount,
    pub category: String,
    pub allergens: Vec<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

/// Status of a lunch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunchOrderStatus {
    /// Placed ahead of time, not yet fulfilled.
    Ordered,
    /// The meal was handed over and the balance debited.
    Served,
}

impl LunchOrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Served => "served",
        }
    }
}

/// Parse failure for [`LunchOrderStatus`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown lunch order status: {0}")]
pub struct UnknownLunchOrderStatus(pub String);

impl std::str::FromStr for LunchOrderStatus {
    type Err = UnknownLunchOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ordered" => Ok(Self::Ordered),
            "served" => Ok(Self::Served),
            other => Err(UnknownLunchOrderStatus(other.to_owned())),
        }
    }
}

/// A lunch order or serving record for one student on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct LunchOrder {
    pub id: LunchOrderId,
    pub student_id: StudentId,
    /// Absent for serve records created at the counter without a menu pick.
    pub menu_item_id: Option<MenuItemId>,
    /// Amount debited (the daily rate for serve records, the item price for
    /// placed orders).
    pub amount: Amount,
    pub status: LunchOrderStatus,
    pub date: DateTime<Utc>,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LunchOrder {
    /// Build a serve record dated now.
    pub fn served_now(student_id: StudentId, amount: Amount) -> Self {
        let now = Utc::now();
        Self {
            id: LunchOrderId::random(),
            student_id,
            menu_item_id: None,
            amount,
            status: LunchOrderStatus::Served,
            date: now,
            special_instructions: None,
            created_at: now,
        }
    }
}

/// Dietary profile a parent maintains for a student. Absent rows read as
/// empty defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LunchPreferences {
    pub dietary: Vec<String>,
    pub allergies: Vec<String>,
    pub favorites: Vec<String>,
}
