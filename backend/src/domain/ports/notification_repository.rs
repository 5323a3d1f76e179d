//! Persistence port for stored notifications.

use async_trait::async_trait;

use super::errors::RepositoryError;
use crate::domain::{Notification, NotificationId, UserId};

/// Paging and filtering for a recipient's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationListQuery {
    pub limit: i64,
    pub skip: i64,
    pub unread_only: bool,
}

impl Default for NotificationListQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            skip: 0,
            unread_only: false,
        }
    }
}

/// Persistence port for notification inboxes. All reads and mutations are
/// scoped to the recipient so accounts cannot touch each other's rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert one notification.
    async fn insert(&self, notification: &Notification) -> Result<(), RepositoryError>;

    /// Insert a batch (admin broadcasts).
    async fn insert_many(&self, notifications: &[Notification]) -> Result<(), RepositoryError>;

    /// Page through a recipient's inbox, newest first.
    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, RepositoryError>;

    /// Count unread notifications for a recipient.
    async fn unread_count(&self, recipient_id: UserId) -> Result<i64, RepositoryError>;

    /// Mark one notification read; `false` when no owned row matched.
    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool, RepositoryError>;

    /// Mark every unread notification read; returns the number updated.
    async fn mark_all_read(&self, recipient_id: UserId) -> Result<u64, RepositoryError>;

    /// Delete one owned notification; `false` when no row matched.
    async fn delete(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool, RepositoryError>;
}
