//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Reading rows converts stored status strings back into domain
//! enums, failing the query if a row carries an unknown value.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::RepositoryError;
use crate::domain::{
    Amount, LunchOrder, LunchOrderId, MenuItem, MenuItemId, Notification, NotificationId, Payment,
    PaymentId, ReplyId, Student, StudentId, SupportTicket, TicketId, TicketReply, User, UserId,
};

use super::schema::{
    lunch_orders, lunch_preferences, menu_items, notifications, payments, students,
    support_tickets, ticket_replies, users,
};

/// Parse a stored enum string, naming the column in the failure.
fn parse_column<T>(value: &str, column: &str) -> Result<T, RepositoryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err| RepositoryError::query(format!("invalid {column} value: {err}")))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_domain(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            role: parse_column(&self.role, "role")?,
            password_hash: self.password_hash,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub role: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub grade: String,
    pub admission_number: String,
    pub dietary_preferences: Vec<String>,
    pub allergies: Vec<String>,
    pub other_allergies: Option<String>,
    pub additional_notes: Option<String>,
    pub balance: i64,
    pub status: String,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentRow {
    pub fn into_domain(self) -> Result<Student, RepositoryError> {
        Ok(Student {
            id: StudentId::from_uuid(self.id),
            parent_id: self.parent_id.map(UserId::from_uuid),
            name: self.name,
            grade: self.grade,
            admission_number: self.admission_number,
            dietary_preferences: self.dietary_preferences,
            allergies: self.allergies,
            other_allergies: self.other_allergies,
            additional_notes: self.additional_notes,
            balance: Amount::from_minor(self.balance),
            status: parse_column(&self.status, "status")?,
            last_payment_at: self.last_payment_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow<'a> {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: &'a str,
    pub grade: &'a str,
    pub admission_number: &'a str,
    pub dietary_preferences: &'a [String],
    pub allergies: &'a [String],
    pub other_allergies: Option<&'a str>,
    pub additional_notes: Option<&'a str>,
    pub balance: i64,
    pub status: &'a str,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = students)]
pub(crate) struct StudentChangeset<'a> {
    pub name: &'a str,
    pub grade: &'a str,
    pub admission_number: &'a str,
    pub dietary_preferences: &'a [String],
    pub allergies: &'a [String],
    pub other_allergies: Option<&'a str>,
    pub additional_notes: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub student_id: Uuid,
    pub amount: i64,
    pub payment_type: String,
    pub category: String,
    pub description: Option<String>,
    pub status: String,
    pub gateway_ref: Option<String>,
    pub payment_link: Option<String>,
    pub transaction_id: Option<String>,
    pub gateway_payload: Option<serde_json::Value>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRow {
    pub fn into_domain(self) -> Result<Payment, RepositoryError> {
        Ok(Payment {
            id: PaymentId::from_uuid(self.id),
            parent_id: UserId::from_uuid(self.parent_id),
            student_id: StudentId::from_uuid(self.student_id),
            amount: Amount::from_minor(self.amount),
            payment_type: self.payment_type,
            category: self.category,
            description: self.description,
            status: parse_column(&self.status, "status")?,
            gateway_ref: self.gateway_ref,
            payment_link: self.payment_link,
            transaction_id: self.transaction_id,
            gateway_payload: self.gateway_payload,
            failure_reason: self.failure_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub student_id: Uuid,
    pub amount: i64,
    pub payment_type: &'a str,
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub gateway_ref: Option<&'a str>,
    pub payment_link: Option<&'a str>,
    pub transaction_id: Option<&'a str>,
    pub gateway_payload: Option<&'a serde_json::Value>,
    pub failure_reason: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Menu items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MenuItemRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub category: String,
    pub allergens: Vec<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl MenuItemRow {
    pub fn into_domain(self) -> MenuItem {
        MenuItem {
            id: MenuItemId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            price: Amount::from_minor(self.price),
            category: self.category,
            allergens: self.allergens,
            available: self.available,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = menu_items)]
pub(crate) struct NewMenuItemRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: i64,
    pub category: &'a str,
    pub allergens: &'a [String],
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Lunch orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lunch_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LunchOrderRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub menu_item_id: Option<Uuid>,
    pub amount: i64,
    pub status: String,
    pub date: DateTime<Utc>,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LunchOrderRow {
    pub fn into_domain(self) -> Result<LunchOrder, RepositoryError> {
        Ok(LunchOrder {
            id: LunchOrderId::from_uuid(self.id),
            student_id: StudentId::from_uuid(self.student_id),
            menu_item_id: self.menu_item_id.map(MenuItemId::from_uuid),
            amount: Amount::from_minor(self.amount),
            status: parse_column(&self.status, "status")?,
            date: self.date,
            special_instructions: self.special_instructions,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lunch_orders)]
pub(crate) struct NewLunchOrderRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub menu_item_id: Option<Uuid>,
    pub amount: i64,
    pub status: &'a str,
    pub date: DateTime<Utc>,
    pub special_instructions: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Lunch preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lunch_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LunchPreferencesRow {
    #[expect(dead_code, reason = "keyed lookups never read the key back")]
    pub student_id: Uuid,
    pub dietary: Vec<String>,
    pub allergies: Vec<String>,
    pub favorites: Vec<String>,
    #[expect(dead_code, reason = "audit column not surfaced in the domain")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lunch_preferences)]
pub(crate) struct UpsertLunchPreferencesRow<'a> {
    pub student_id: Uuid,
    pub dietary: &'a [String],
    pub allergies: &'a [String],
    pub favorites: &'a [String],
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Support tickets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = support_tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SupportTicketRow {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub subject: String,
    pub message: String,
    pub priority: String,
    pub status: String,
    pub attachment_path: Option<String>,
    pub admin_response: Option<String>,
    pub admin_response_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupportTicketRow {
    pub fn into_domain(self) -> Result<SupportTicket, RepositoryError> {
        Ok(SupportTicket {
            id: TicketId::from_uuid(self.id),
            parent_id: UserId::from_uuid(self.parent_id),
            subject: self.subject,
            message: self.message,
            priority: parse_column(&self.priority, "priority")?,
            status: parse_column(&self.status, "status")?,
            attachment_path: self.attachment_path,
            admin_response: self.admin_response,
            admin_response_at: self.admin_response_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = support_tickets)]
pub(crate) struct NewSupportTicketRow<'a> {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub subject: &'a str,
    pub message: &'a str,
    pub priority: &'a str,
    pub status: &'a str,
    pub attachment_path: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ticket_replies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketReplyRow {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl TicketReplyRow {
    pub fn into_domain(self) -> Result<TicketReply, RepositoryError> {
        Ok(TicketReply {
            id: ReplyId::from_uuid(self.id),
            ticket_id: TicketId::from_uuid(self.ticket_id),
            author: parse_column(&self.author, "author")?,
            message: self.message,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ticket_replies)]
pub(crate) struct NewTicketReplyRow<'a> {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author: &'a str,
    pub message: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub priority: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationRow {
    pub fn into_domain(self) -> Result<Notification, RepositoryError> {
        Ok(Notification {
            id: NotificationId::from_uuid(self.id),
            recipient_id: UserId::from_uuid(self.recipient_id),
            title: self.title,
            body: self.body,
            kind: parse_column(&self.kind, "kind")?,
            priority: parse_column(&self.priority, "priority")?,
            read: self.read,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub kind: &'a str,
    pub priority: &'a str,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
