//! PostgreSQL-backed [`NotificationRepository`] implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationListQuery, NotificationRepository, RepositoryError};
use crate::domain::{Notification, NotificationId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::DbPool;
use super::schema::notifications;

/// Diesel adapter for notification inboxes.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn new_row(notification: &Notification) -> NewNotificationRow<'_> {
    NewNotificationRow {
        id: *notification.id.as_uuid(),
        recipient_id: *notification.recipient_id.as_uuid(),
        title: &notification.title,
        body: &notification.body,
        kind: notification.kind.as_str(),
        priority: notification.priority.as_str(),
        read: notification.read,
        created_at: notification.created_at,
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(notifications::table)
            .values(&new_row(notification))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn insert_many(&self, batch: &[Notification]) -> Result<(), RepositoryError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewNotificationRow<'_>> = batch.iter().map(new_row).collect();
        diesel::insert_into(notifications::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut stmt = notifications::table
            .filter(notifications::recipient_id.eq(*recipient_id.as_uuid()))
            .into_boxed();
        if query.unread_only {
            stmt = stmt.filter(notifications::read.eq(false));
        }

        let rows: Vec<NotificationRow> = stmt
            .order(notifications::created_at.desc())
            .offset(query.skip)
            .limit(query.limit)
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(NotificationRow::into_domain).collect()
    }

    async fn unread_count(&self, recipient_id: UserId) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        notifications::table
            .filter(notifications::recipient_id.eq(recipient_id.as_uuid()))
            .filter(notifications::read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            notifications::table
                .filter(notifications::id.eq(id.as_uuid()))
                .filter(notifications::recipient_id.eq(recipient_id.as_uuid())),
        )
        .set(notifications::read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn mark_all_read(&self, recipient_id: UserId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            notifications::table
                .filter(notifications::recipient_id.eq(recipient_id.as_uuid()))
                .filter(notifications::read.eq(false)),
        )
        .set(notifications::read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated as u64)
    }

    async fn delete(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            notifications::table
                .filter(notifications::id.eq(id.as_uuid()))
                .filter(notifications::recipient_id.eq(recipient_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
