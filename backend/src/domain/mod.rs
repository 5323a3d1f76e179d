//! Core domain: entities, value types, ports and the services behind them.
//!
//! Everything in this module is persistence and transport agnostic. The
//! adapters under `inbound` and `outbound` depend on these types, never
//! the other way round.

mod error;
mod ids;
mod lunch;
mod money;
mod notification;
mod payment;
pub mod ports;
pub mod services;
mod student;
mod support;
mod user;

pub use error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use ids::{
    LunchOrderId, MenuItemId, NotificationId, PaymentId, ReplyId, StudentId, TicketId, UserId,
};
pub use lunch::{LunchOrder, LunchOrderStatus, LunchPreferences, MenuItem};
pub use money::Amount;
pub use notification::{Notification, NotificationPriority, NotificationType};
pub use payment::{Payment, PaymentStatus};
pub use student::{eligibility, EligibilityStatus, Student, StudentStatus};
pub use support::{
    ReplyAuthor, SupportTicket, TicketPriority, TicketReply, TicketStatus, TicketWithReplies,
};
pub use user::{Caller, Role, UnknownRole, User};
