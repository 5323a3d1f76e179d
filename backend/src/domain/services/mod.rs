//! Domain services implementing the driving ports.
//!
//! Each service is generic over the driven ports it needs, holds them as
//! `Arc`, and enforces authorisation before touching a repository. Ownership
//! misses answer `not_found` rather than `forbidden` so callers cannot probe
//! for other parents' records.

mod accounts;
mod lunch;
mod notifications;
mod payments;
mod students;
mod support;

pub use accounts::AccountServiceImpl;
pub use lunch::LunchServiceImpl;
pub use notifications::NotificationServiceImpl;
pub use payments::PaymentServiceImpl;
pub use students::StudentServiceImpl;
pub use support::SupportServiceImpl;

use crate::domain::ports::RepositoryError;
use crate::domain::Error;

/// Map a repository failure into a domain error, tagging which repository
/// produced it.
pub(crate) fn map_repo_error(source: &str, error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            Error::service_unavailable(format!("{source} repository unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("{source} repository error: {message}"))
        }
        RepositoryError::DuplicateKey { field } => {
            Error::invalid_request(format!("{field} already exists"))
        }
    }
}
