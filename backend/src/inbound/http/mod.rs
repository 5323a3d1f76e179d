//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod lunch;
pub mod notifications;
pub mod payments;
pub mod state;
pub mod students;
pub mod support;
pub mod validation;

pub use error::ApiResult;
