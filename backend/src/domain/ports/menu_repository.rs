//! Persistence port for canteen menu items.

use async_trait::async_trait;

use super::errors::RepositoryError;
use crate::domain::{MenuItem, MenuItemId};

/// Persistence port for the menu catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Insert a new menu item.
    async fn insert(&self, item: &MenuItem) -> Result<(), RepositoryError>;

    /// Fetch one item by identifier.
    async fn find_by_id(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError>;

    /// All menu items, alphabetical by name.
    async fn list(&self) -> Result<Vec<MenuItem>, RepositoryError>;
}
