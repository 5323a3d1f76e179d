//! Driving port for lunch service, menus, orders and preferences.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Amount, Caller, EligibilityStatus, Error, LunchOrder, LunchPreferences, MenuItem, MenuItemId,
    StudentId,
};

/// One row of the serving-line eligibility report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityRow {
    pub student_id: StudentId,
    pub name: String,
    pub grade: String,
    pub balance: Amount,
    pub daily_rate: Amount,
    pub status: EligibilityStatus,
}

/// Payload for serving lunch to a student.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServeLunchRequest {
    pub student_id: StudentId,
    /// Overrides the configured daily rate when set.
    pub daily_rate: Option<Amount>,
}

/// Payload for adding a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Amount,
    pub category: Option<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Listing filter for lunch orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LunchOrderFilter {
    pub student_id: Option<StudentId>,
    pub date: Option<DateTime<Utc>>,
}

/// Payload for placing a lunch order against a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaceOrderRequest {
    pub student_id: StudentId,
    pub menu_item_id: MenuItemId,
    pub special_instructions: Option<String>,
    /// Day the order is for; today when absent.
    pub date: Option<DateTime<Utc>>,
}

/// Replacement preferences for a student. Absent fields clear nothing;
/// each listed field replaces the stored value wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreferencesUpdate {
    pub dietary: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub favorites: Option<Vec<String>>,
}

/// Driving port for the lunch domain. Serving, menu management and the
/// eligibility report are admin operations; orders and preferences follow
/// student ownership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LunchService: Send + Sync {
    /// Eligibility of every active student against the daily rate.
    async fn eligibility_report(&self, caller: &Caller) -> Result<Vec<EligibilityRow>, Error>;

    /// Serve lunch: debit the student and record a served order.
    async fn serve(&self, caller: &Caller, request: ServeLunchRequest)
        -> Result<LunchOrder, Error>;

    /// List the menu.
    async fn list_menu(&self, caller: &Caller) -> Result<Vec<MenuItem>, Error>;

    /// Add a menu item.
    async fn create_menu_item(
        &self,
        caller: &Caller,
        request: NewMenuItemRequest,
    ) -> Result<MenuItem, Error>;

    /// List lunch orders visible to the caller.
    async fn list_orders(
        &self,
        caller: &Caller,
        filter: LunchOrderFilter,
    ) -> Result<Vec<LunchOrder>, Error>;

    /// Place an order for an owned student against a menu item.
    async fn place_order(
        &self,
        caller: &Caller,
        request: PlaceOrderRequest,
    ) -> Result<LunchOrder, Error>;

    /// Fetch a student's lunch preferences.
    async fn preferences(
        &self,
        caller: &Caller,
        student_id: StudentId,
    ) -> Result<LunchPreferences, Error>;

    /// Update a student's lunch preferences.
    async fn update_preferences(
        &self,
        caller: &Caller,
        student_id: StudentId,
        update: PreferencesUpdate,
    ) -> Result<LunchPreferences, Error>;
}
