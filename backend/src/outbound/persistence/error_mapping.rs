//! Shared mapping from pool and Diesel failures onto [`RepositoryError`].

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RepositoryError::connection(message)
        }
    }
}

/// Friendly field name for unique-violation reporting, derived from the
/// constraint name.
fn duplicate_field(info: &dyn DatabaseErrorInformation) -> String {
    match info.constraint_name() {
        Some(name) if name.contains("email") => "email".to_owned(),
        Some(name) if name.contains("admission_number") => "admission number".to_owned(),
        Some(name) => name.to_owned(),
        None => "value".to_owned(),
    }
}

pub(crate) fn map_diesel_error(error: DieselError) -> RepositoryError {
    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    } else {
        debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        );
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RepositoryError::duplicate_key(duplicate_field(info.as_ref()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        DieselError::NotFound => RepositoryError::query("record not found"),
        _ => RepositoryError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_failures_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, RepositoryError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn missing_rows_map_to_query_errors() {
        let err = map_diesel_error(DieselError::NotFound);
        assert!(matches!(err, RepositoryError::Query { .. }));
    }
}
