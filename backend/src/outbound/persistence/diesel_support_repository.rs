//! PostgreSQL-backed [`SupportTicketRepository`] implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{RepositoryError, SupportTicketRepository};
use crate::domain::{SupportTicket, TicketId, TicketReply, TicketStatus, TicketWithReplies, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSupportTicketRow, NewTicketReplyRow, SupportTicketRow, TicketReplyRow};
use super::pool::DbPool;
use super::schema::{support_tickets, ticket_replies};

/// Diesel adapter for support tickets and their reply threads.
#[derive(Clone)]
pub struct DieselSupportTicketRepository {
    pool: DbPool,
}

impl DieselSupportTicketRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Attach reply threads to a page of tickets with one grouped query.
    async fn attach_replies(
        conn: &mut diesel_async::pooled_connection::bb8::PooledConnection<
            '_,
            diesel_async::AsyncPgConnection,
        >,
        tickets: Vec<SupportTicketRow>,
    ) -> Result<Vec<TicketWithReplies>, RepositoryError> {
        let ids: Vec<uuid::Uuid> = tickets.iter().map(|row| row.id).collect();
        let reply_rows: Vec<TicketReplyRow> = ticket_replies::table
            .filter(ticket_replies::ticket_id.eq_any(&ids))
            .order(ticket_replies::created_at.asc())
            .select(TicketReplyRow::as_select())
            .load(conn)
            .await
            .map_err(map_diesel_error)?;

        let mut grouped: std::collections::HashMap<uuid::Uuid, Vec<TicketReply>> =
            std::collections::HashMap::new();
        for row in reply_rows {
            let ticket_id = row.ticket_id;
            grouped
                .entry(ticket_id)
                .or_default()
                .push(row.into_domain()?);
        }

        tickets
            .into_iter()
            .map(|row| {
                let replies = grouped.remove(&row.id).unwrap_or_default();
                Ok(TicketWithReplies {
                    ticket: row.into_domain()?,
                    replies,
                })
            })
            .collect()
    }
}

fn new_ticket_row(ticket: &SupportTicket) -> NewSupportTicketRow<'_> {
    NewSupportTicketRow {
        id: *ticket.id.as_uuid(),
        parent_id: *ticket.parent_id.as_uuid(),
        subject: &ticket.subject,
        message: &ticket.message,
        priority: ticket.priority.as_str(),
        status: ticket.status.as_str(),
        attachment_path: ticket.attachment_path.as_deref(),
        created_at: ticket.created_at,
        updated_at: ticket.updated_at,
    }
}

#[async_trait]
impl SupportTicketRepository for DieselSupportTicketRepository {
    async fn insert(&self, ticket: &SupportTicket) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(support_tickets::table)
            .values(&new_ticket_row(ticket))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: TicketId,
    ) -> Result<Option<TicketWithReplies>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SupportTicketRow> = support_tickets::table
            .filter(support_tickets::id.eq(id.as_uuid()))
            .select(SupportTicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut with_replies = Self::attach_replies(&mut conn, vec![row]).await?;
        Ok(with_replies.pop())
    }

    async fn list_all(&self) -> Result<Vec<TicketWithReplies>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SupportTicketRow> = support_tickets::table
            .order(support_tickets::created_at.desc())
            .select(SupportTicketRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Self::attach_replies(&mut conn, rows).await
    }

    async fn list_by_parent(
        &self,
        parent_id: UserId,
    ) -> Result<Vec<TicketWithReplies>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SupportTicketRow> = support_tickets::table
            .filter(support_tickets::parent_id.eq(parent_id.as_uuid()))
            .order(support_tickets::created_at.desc())
            .select(SupportTicketRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Self::attach_replies(&mut conn, rows).await
    }

    async fn append_reply(
        &self,
        reply: &TicketReply,
        status: TicketStatus,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ticket_id = *reply.ticket_id.as_uuid();
        let now = Utc::now();
        let row = NewTicketReplyRow {
            id: *reply.id.as_uuid(),
            ticket_id,
            author: reply.author.as_str(),
            message: &reply.message,
            created_at: reply.created_at,
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(ticket_replies::table)
                    .values(&row)
                    .execute(conn)
                    .await?;

                diesel::update(
                    support_tickets::table.filter(support_tickets::id.eq(ticket_id)),
                )
                .set((
                    support_tickets::status.eq(status.as_str()),
                    support_tickets::updated_at.eq(now),
                ))
                .execute(conn)
                .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn record_admin_response(
        &self,
        id: TicketId,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(support_tickets::table.filter(support_tickets::id.eq(id.as_uuid())))
            .set((
                support_tickets::admin_response.eq(response),
                support_tickets::admin_response_at.eq(at),
                support_tickets::updated_at.eq(at),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn set_status(
        &self,
        id: TicketId,
        status: TicketStatus,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated =
            diesel::update(support_tickets::table.filter(support_tickets::id.eq(id.as_uuid())))
                .set((
                    support_tickets::status.eq(status.as_str()),
                    support_tickets::updated_at.eq(Utc::now()),
                ))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
