//! PostgreSQL persistence adapters using Diesel.
//!
//! Thin translators between Diesel rows and domain types, pooled through
//! `bb8` with `diesel-async`. Row structs and table definitions stay
//! private to this module; every failure maps onto
//! [`crate::domain::ports::RepositoryError`].

mod diesel_lunch_order_repository;
mod diesel_lunch_preferences_repository;
mod diesel_menu_repository;
mod diesel_notification_repository;
mod diesel_payment_repository;
mod diesel_student_repository;
mod diesel_support_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_lunch_order_repository::DieselLunchOrderRepository;
pub use diesel_lunch_preferences_repository::DieselLunchPreferencesRepository;
pub use diesel_menu_repository::DieselMenuRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_student_repository::DieselStudentRepository;
pub use diesel_support_repository::DieselSupportTicketRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
