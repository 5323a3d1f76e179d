//! Persistence port for student aggregates.

use async_trait::async_trait;

use super::errors::RepositoryError;
use crate::domain::{Student, StudentId, UserId};

/// Persistence port for students and their balances.
///
/// Balance mutations tied to other writes (payment credits, lunch debits)
/// live on the payment and lunch-order ports so the adapter can run them in
/// one transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new student. Duplicate admission numbers surface as
    /// [`RepositoryError::DuplicateKey`].
    async fn insert(&self, student: &Student) -> Result<(), RepositoryError>;

    /// Fetch a student by identifier.
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError>;

    /// All students, newest first.
    async fn list_all(&self) -> Result<Vec<Student>, RepositoryError>;

    /// Students attached to the given parent, newest first.
    async fn list_by_parent(&self, parent_id: UserId) -> Result<Vec<Student>, RepositoryError>;

    /// Persist a full student row.
    async fn update(&self, student: &Student) -> Result<(), RepositoryError>;

    /// Delete a student; `false` when no row matched.
    async fn delete(&self, id: StudentId) -> Result<bool, RepositoryError>;
}
