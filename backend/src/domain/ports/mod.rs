//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain reaches databases and the payment
//! gateway; driving ports are the use-case traits HTTP handlers depend on.
//! Each driven trait exposes strongly typed errors so adapters map their
//! failures into predictable variants.

mod account_service;
mod errors;
mod event_notifier;
mod lunch_order_repository;
mod lunch_preferences_repository;
mod lunch_service;
mod menu_repository;
mod notification_repository;
mod notification_service;
mod payment_gateway;
mod payment_repository;
mod payment_service;
mod student_repository;
mod student_service;
mod support_repository;
mod support_service;
mod user_repository;

pub use account_service::{AccountService, LoginRequest, RegisterAccountRequest};
pub use errors::{GatewayError, RepositoryError};
pub use event_notifier::EventNotifier;
pub use lunch_order_repository::{LunchOrderQuery, LunchOrderRepository};
pub use lunch_preferences_repository::LunchPreferencesRepository;
pub use lunch_service::{
    EligibilityRow, LunchOrderFilter, LunchService, NewMenuItemRequest, PlaceOrderRequest,
    PreferencesUpdate, ServeLunchRequest,
};
pub use menu_repository::MenuRepository;
pub use notification_repository::{NotificationListQuery, NotificationRepository};
pub use notification_service::{NotificationPage, NotificationService, NotificationQuery};
pub use payment_gateway::{
    CreateSessionRequest, GatewayCustomer, GatewaySession, PaymentGateway, VerifiedTransaction,
};
pub use payment_repository::{PaymentFilter, PaymentRepository};
pub use payment_service::{
    InitiatePaymentRequest, InitiatedPayment, ManualPaymentRequest, PaymentListFilter,
    PaymentService, VerifyPaymentRequest,
};
pub use student_repository::StudentRepository;
pub use student_service::{NewStudentRequest, StudentPatch, StudentService};
pub use support_repository::SupportTicketRepository;
pub use support_service::{NewTicketRequest, SupportService};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use account_service::MockAccountService;
#[cfg(test)]
pub use event_notifier::MockEventNotifier;
#[cfg(test)]
pub use lunch_order_repository::MockLunchOrderRepository;
#[cfg(test)]
pub use lunch_preferences_repository::MockLunchPreferencesRepository;
#[cfg(test)]
pub use lunch_service::MockLunchService;
#[cfg(test)]
pub use menu_repository::MockMenuRepository;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
#[cfg(test)]
pub use notification_service::MockNotificationService;
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
#[cfg(test)]
pub use payment_service::MockPaymentService;
#[cfg(test)]
pub use student_repository::MockStudentRepository;
#[cfg(test)]
pub use student_service::MockStudentService;
#[cfg(test)]
pub use support_repository::MockSupportTicketRepository;
#[cfg(test)]
pub use support_service::MockSupportService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
