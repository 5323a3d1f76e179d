//! Persistence port for support tickets and their conversations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::RepositoryError;
use crate::domain::{SupportTicket, TicketId, TicketReply, TicketStatus, TicketWithReplies, UserId};

/// Persistence port for support tickets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupportTicketRepository: Send + Sync {
    /// Insert a new ticket.
    async fn insert(&self, ticket: &SupportTicket) -> Result<(), RepositoryError>;

    /// Fetch a ticket with its replies ordered oldest first.
    async fn find_by_id(&self, id: TicketId)
    -> Result<Option<TicketWithReplies>, RepositoryError>;

    /// All tickets, newest first.
    async fn list_all(&self) -> Result<Vec<TicketWithReplies>, RepositoryError>;

    /// Tickets raised by the given parent, newest first.
    async fn list_by_parent(
        &self,
        parent_id: UserId,
    ) -> Result<Vec<TicketWithReplies>, RepositoryError>;

    /// Append a reply and move the ticket to `status` in one transaction.
    async fn append_reply(
        &self,
        reply: &TicketReply,
        status: TicketStatus,
    ) -> Result<(), RepositoryError>;

    /// Stamp the first admin response summary fields on the ticket.
    async fn record_admin_response(
        &self,
        id: TicketId,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// Overwrite the ticket status; `false` when no row matched.
    async fn set_status(&self, id: TicketId, status: TicketStatus)
    -> Result<bool, RepositoryError>;
}
