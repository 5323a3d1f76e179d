//! Persistence port for account aggregates.

use async_trait::async_trait;

use super::errors::RepositoryError;
use crate::domain::{User, UserId};

/// Persistence port for registered accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Duplicate emails surface as
    /// [`RepositoryError::DuplicateKey`].
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Fetch an account by email, used at login and registration.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// All admin accounts, for broadcast notifications.
    async fn list_admins(&self) -> Result<Vec<User>, RepositoryError>;
}
