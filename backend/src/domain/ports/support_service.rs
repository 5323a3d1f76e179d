//! Driving port for support tickets.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Caller, Error, TicketId, TicketPriority, TicketStatus, TicketWithReplies};

/// Payload for opening a support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTicketRequest {
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub priority: TicketPriority,
    /// Server-side path of an uploaded attachment, when one was submitted.
    #[serde(skip)]
    pub attachment_path: Option<String>,
}

/// Driving port for the support domain. Parents manage their own tickets;
/// responding and status changes are admin operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupportService: Send + Sync {
    /// List tickets visible to the caller, with their reply threads.
    async fn list(&self, caller: &Caller) -> Result<Vec<TicketWithReplies>, Error>;

    /// Open a new ticket for the calling parent.
    async fn create(
        &self,
        caller: &Caller,
        request: NewTicketRequest,
    ) -> Result<TicketWithReplies, Error>;

    /// Append a parent reply; reopens the ticket.
    async fn reply(
        &self,
        caller: &Caller,
        id: TicketId,
        message: String,
    ) -> Result<TicketWithReplies, Error>;

    /// Append an admin response; moves the ticket to in-progress.
    async fn respond(
        &self,
        caller: &Caller,
        id: TicketId,
        message: String,
    ) -> Result<TicketWithReplies, Error>;

    /// Set a ticket's status.
    async fn set_status(
        &self,
        caller: &Caller,
        id: TicketId,
        status: TicketStatus,
    ) -> Result<TicketWithReplies, Error>;
}
