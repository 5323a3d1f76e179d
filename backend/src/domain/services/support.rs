//! Support ticket workflow.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::map_repo_error;
use crate::domain::ports::{
    EventNotifier, NewTicketRequest, SupportService, SupportTicketRepository,
};
use crate::domain::{
    Caller, Error, ReplyAuthor, ReplyId, SupportTicket, TicketId, TicketReply, TicketStatus,
    TicketWithReplies,
};

/// Support service over the ticket repository. Replies drive the status
/// machine: a parent reply reopens the ticket, the first admin response
/// moves it to in-progress and is copied onto the ticket summary.
#[derive(Clone)]
pub struct SupportServiceImpl<T> {
    tickets: Arc<T>,
    notifier: Arc<dyn EventNotifier>,
}

impl<T> SupportServiceImpl<T> {
    pub fn new(tickets: Arc<T>, notifier: Arc<dyn EventNotifier>) -> Self {
        Self { tickets, notifier }
    }
}

impl<T> SupportServiceImpl<T>
where
    T: SupportTicketRepository,
{
    async fn fetch_visible(
        &self,
        caller: &Caller,
        id: TicketId,
    ) -> Result<TicketWithReplies, Error> {
        let ticket = self
            .tickets
            .find_by_id(id)
            .await
            .map_err(|err| map_repo_error("support", err))?
            .ok_or_else(|| Error::not_found("ticket not found"))?;
        if !caller.is_admin() && ticket.ticket.parent_id != caller.id {
            return Err(Error::not_found("ticket not found"));
        }
        Ok(ticket)
    }

    async fn refetch(&self, id: TicketId) -> Result<TicketWithReplies, Error> {
        self.tickets
            .find_by_id(id)
            .await
            .map_err(|err| map_repo_error("support", err))?
            .ok_or_else(|| Error::internal("ticket disappeared during update"))
    }
}

#[async_trait]
impl<T> SupportService for SupportServiceImpl<T>
where
    T: SupportTicketRepository,
{
    async fn list(&self, caller: &Caller) -> Result<Vec<TicketWithReplies>, Error> {
        let tickets = if caller.is_admin() {
            self.tickets.list_all().await
        } else {
            self.tickets.list_by_parent(caller.id).await
        };
        tickets.map_err(|err| map_repo_error("support", err))
    }

    async fn create(
        &self,
        caller: &Caller,
        request: NewTicketRequest,
    ) -> Result<TicketWithReplies, Error> {
        if request.subject.trim().is_empty() {
            return Err(Error::invalid_request("subject must not be empty"));
        }
        if request.message.trim().is_empty() {
            return Err(Error::invalid_request("message must not be empty"));
        }

        let now = Utc::now();
        let ticket = SupportTicket {
            id: TicketId::random(),
            parent_id: caller.id,
            subject: request.subject.trim().to_owned(),
            message: request.message,
            priority: request.priority,
            status: TicketStatus::Open,
            attachment_path: request.attachment_path,
            admin_response: None,
            admin_response_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tickets
            .insert(&ticket)
            .await
            .map_err(|err| map_repo_error("support", err))?;

        if let Err(err) = self
            .notifier
            .ticket_created(&caller.name, &ticket.subject)
            .await
        {
            tracing::warn!(error = %err, "ticket-created notification failed");
        }

        tracing::info!(ticket_id = %ticket.id, "support ticket opened");
        Ok(TicketWithReplies {
            ticket,
            replies: Vec::new(),
        })
    }

    async fn reply(
        &self,
        caller: &Caller,
        id: TicketId,
        message: String,
    ) -> Result<TicketWithReplies, Error> {
        if message.trim().is_empty() {
            return Err(Error::invalid_request("message must not be empty"));
        }
        let existing = self.fetch_visible(caller, id).await?;

        let reply = TicketReply {
            id: ReplyId::random(),
            ticket_id: id,
            author: ReplyAuthor::Parent,
            message,
            created_at: Utc::now(),
        };
        // A parent reply reopens the conversation.
        self.tickets
            .append_reply(&reply, TicketStatus::Open)
            .await
            .map_err(|err| map_repo_error("support", err))?;

        if let Err(err) = self
            .notifier
            .parent_replied(&caller.name, &existing.ticket.subject)
            .await
        {
            tracing::warn!(error = %err, "parent-replied notification failed");
        }

        self.refetch(id).await
    }

    async fn respond(
        &self,
        caller: &Caller,
        id: TicketId,
        message: String,
    ) -> Result<TicketWithReplies, Error> {
        if !caller.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        if message.trim().is_empty() {
            return Err(Error::invalid_request("message must not be empty"));
        }
        let existing = self.fetch_visible(caller, id).await?;

        let now = Utc::now();
        let reply = TicketReply {
            id: ReplyId::random(),
            ticket_id: id,
            author: ReplyAuthor::Admin,
            message: message.clone(),
            created_at: now,
        };
        self.tickets
            .append_reply(&reply, TicketStatus::InProgress)
            .await
            .map_err(|err| map_repo_error("support", err))?;

        // The first response is duplicated onto the ticket for summaries.
        if existing.ticket.admin_response.is_none() {
            self.tickets
                .record_admin_response(id, &message, now)
                .await
                .map_err(|err| map_repo_error("support", err))?;
        }

        if let Err(err) = self
            .notifier
            .ticket_responded(existing.ticket.parent_id, &existing.ticket.subject)
            .await
        {
            tracing::warn!(error = %err, "ticket-responded notification failed");
        }

        self.refetch(id).await
    }

    async fn set_status(
        &self,
        caller: &Caller,
        id: TicketId,
        status: TicketStatus,
    ) -> Result<TicketWithReplies, Error> {
        if !caller.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        let updated = self
            .tickets
            .set_status(id, status)
            .await
            .map_err(|err| map_repo_error("support", err))?;
        if !updated {
            return Err(Error::not_found("ticket not found"));
        }
        self.refetch(id).await
    }
}
