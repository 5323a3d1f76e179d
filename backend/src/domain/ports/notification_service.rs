//! Driving port for the caller's notification inbox.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Caller, Error, Notification, NotificationId};

/// Inbox listing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NotificationQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub unread_only: bool,
}

fn default_limit() -> i64 {
    50
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            skip: 0,
            unread_only: false,
        }
    }
}

/// One page of a recipient's inbox plus the total unread count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    pub unread: i64,
}

/// Driving port for the notification inbox. Every operation is scoped to
/// the caller's own rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Page through the caller's inbox, newest first.
    async fn list(
        &self,
        caller: &Caller,
        query: NotificationQuery,
    ) -> Result<NotificationPage, Error>;

    /// Mark one owned notification read.
    async fn mark_read(&self, caller: &Caller, id: NotificationId) -> Result<(), Error>;

    /// Mark every unread notification read; returns the number updated.
    async fn mark_all_read(&self, caller: &Caller) -> Result<u64, Error>;

    /// Delete one owned notification.
    async fn delete(&self, caller: &Caller, id: NotificationId) -> Result<(), Error>;
}
