//! Notification inbox service, doubling as the domain event recorder.
//!
//! Notifications are storage only. [`NotificationServiceImpl`] implements
//! both the inbox driving port and [`EventNotifier`], so every other
//! service records events through the same rows parents and admins read
//! back.

use std::sync::Arc;

use async_trait::async_trait;

use super::map_repo_error;
use crate::domain::ports::{
    EventNotifier, NotificationListQuery, NotificationPage, NotificationQuery,
    NotificationRepository, NotificationService, UserRepository,
};
use crate::domain::{
    Amount, Caller, Error, Notification, NotificationId, NotificationPriority, NotificationType,
    UserId,
};

const MAX_PAGE: i64 = 100;

/// Notification service over the notification and user repositories. The
/// user repository resolves the admin audience for operational events.
#[derive(Clone)]
pub struct NotificationServiceImpl<N, U> {
    notifications: Arc<N>,
    users: Arc<U>,
}

impl<N, U> NotificationServiceImpl<N, U> {
    pub fn new(notifications: Arc<N>, users: Arc<U>) -> Self {
        Self {
            notifications,
            users,
        }
    }
}

impl<N, U> NotificationServiceImpl<N, U>
where
    N: NotificationRepository,
    U: UserRepository,
{
    async fn record(&self, notification: Notification) -> Result<(), Error> {
        self.notifications
            .insert(&notification)
            .await
            .map_err(|err| map_repo_error("notification", err))
    }

    /// Fan one event out to every admin account.
    async fn record_for_admins(
        &self,
        kind: NotificationType,
        priority: NotificationPriority,
        title: &str,
        body: &str,
    ) -> Result<(), Error> {
        let admins = self
            .users
            .list_admins()
            .await
            .map_err(|err| map_repo_error("user", err))?;
        let batch: Vec<Notification> = admins
            .into_iter()
            .map(|admin| Notification::new(admin.id, kind, priority, title, body))
            .collect();
        if batch.is_empty() {
            return Ok(());
        }
        self.notifications
            .insert_many(&batch)
            .await
            .map_err(|err| map_repo_error("notification", err))
    }
}

#[async_trait]
impl<N, U> NotificationService for NotificationServiceImpl<N, U>
where
    N: NotificationRepository,
    U: UserRepository,
{
    async fn list(
        &self,
        caller: &Caller,
        query: NotificationQuery,
    ) -> Result<NotificationPage, Error> {
        let list_query = NotificationListQuery {
            limit: query.limit.clamp(1, MAX_PAGE),
            skip: query.skip.max(0),
            unread_only: query.unread_only,
        };
        let items = self
            .notifications
            .list_for_recipient(caller.id, &list_query)
            .await
            .map_err(|err| map_repo_error("notification", err))?;
        let unread = self
            .notifications
            .unread_count(caller.id)
            .await
            .map_err(|err| map_repo_error("notification", err))?;
        Ok(NotificationPage { items, unread })
    }

    async fn mark_read(&self, caller: &Caller, id: NotificationId) -> Result<(), Error> {
        let updated = self
            .notifications
            .mark_read(id, caller.id)
            .await
            .map_err(|err| map_repo_error("notification", err))?;
        if !updated {
            return Err(Error::not_found("notification not found"));
        }
        Ok(())
    }

    async fn mark_all_read(&self, caller: &Caller) -> Result<u64, Error> {
        self.notifications
            .mark_all_read(caller.id)
            .await
            .map_err(|err| map_repo_error("notification", err))
    }

    async fn delete(&self, caller: &Caller, id: NotificationId) -> Result<(), Error> {
        let deleted = self
            .notifications
            .delete(id, caller.id)
            .await
            .map_err(|err| map_repo_error("notification", err))?;
        if !deleted {
            return Err(Error::not_found("notification not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl<N, U> EventNotifier for NotificationServiceImpl<N, U>
where
    N: NotificationRepository,
    U: UserRepository,
{
    async fn payment_succeeded(
        &self,
        parent_id: UserId,
        student_name: &str,
        amount: Amount,
    ) -> Result<(), Error> {
        self.record(Notification::new(
            parent_id,
            NotificationType::Payment,
            NotificationPriority::Medium,
            "Payment Successful",
            format!("Your payment of {amount} for {student_name} has been received"),
        ))
        .await
    }

    async fn payment_failed(
        &self,
        parent_id: UserId,
        student_name: &str,
        amount: Amount,
        reason: &str,
    ) -> Result<(), Error> {
        self.record(Notification::new(
            parent_id,
            NotificationType::Payment,
            NotificationPriority::High,
            "Payment Failed",
            format!("Your payment of {amount} for {student_name} failed: {reason}"),
        ))
        .await
    }

    async fn low_balance(
        &self,
        parent_id: UserId,
        student_name: &str,
        balance: Amount,
    ) -> Result<(), Error> {
        self.record(Notification::new(
            parent_id,
            NotificationType::Lunch,
            NotificationPriority::High,
            "Low Lunch Balance",
            format!("{student_name}'s lunch balance is down to {balance}. Please top up"),
        ))
        .await
    }

    async fn lunch_served(
        &self,
        parent_id: UserId,
        student_name: &str,
        amount: Amount,
        balance_after: Amount,
    ) -> Result<(), Error> {
        self.record(Notification::new(
            parent_id,
            NotificationType::Lunch,
            NotificationPriority::Low,
            "Lunch Served",
            format!(
                "{student_name} was served lunch ({amount}). Remaining balance: {balance_after}"
            ),
        ))
        .await
    }

    async fn student_added(&self, parent_id: UserId, student_name: &str) -> Result<(), Error> {
        self.record(Notification::new(
            parent_id,
            NotificationType::Student,
            NotificationPriority::Low,
            "Student Registered",
            format!("{student_name} has been added to your account"),
        ))
        .await
    }

    async fn ticket_created(&self, parent_name: &str, subject: &str) -> Result<(), Error> {
        self.record_for_admins(
            NotificationType::Support,
            NotificationPriority::Medium,
            "New Support Ticket",
            &format!("{parent_name} opened a ticket: {subject}"),
        )
        .await
    }

    async fn parent_replied(&self, parent_name: &str, subject: &str) -> Result<(), Error> {
        self.record_for_admins(
            NotificationType::Support,
            NotificationPriority::Medium,
            "Ticket Reply",
            &format!("{parent_name} replied on: {subject}"),
        )
        .await
    }

    async fn ticket_responded(&self, parent_id: UserId, subject: &str) -> Result<(), Error> {
        self.record(Notification::new(
            parent_id,
            NotificationType::Support,
            NotificationPriority::Medium,
            "Support Response",
            format!("An admin responded to your ticket: {subject}"),
        ))
        .await
    }

    async fn balance_updated(
        &self,
        parent_id: UserId,
        student_name: &str,
        amount: Amount,
    ) -> Result<(), Error> {
        self.record(Notification::new(
            parent_id,
            NotificationType::Payment,
            NotificationPriority::Medium,
            "Balance Updated",
            format!("{student_name}'s balance was adjusted by {amount}"),
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockNotificationRepository, MockUserRepository};
    use crate::domain::{ErrorCode, Role, User};
    use chrono::Utc;

    fn caller() -> Caller {
        Caller {
            id: UserId::random(),
            name: "Ngozi Okafor".to_owned(),
            email: "ngozi@example.com".to_owned(),
            phone: None,
            role: Role::Parent,
        }
    }

    fn admin_user() -> User {
        User {
            id: UserId::random(),
            name: "Canteen Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            phone: None,
            role: Role::Admin,
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn payment_success_lands_in_the_parents_inbox() {
        let parent_id = UserId::random();
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_insert()
            .withf(move |note: &Notification| {
                note.recipient_id == parent_id
                    && note.kind == NotificationType::Payment
                    && !note.read
                    && note.body.contains("\u{20a6}5,000")
            })
            .times(1)
            .return_once(|_| Ok(()));

        let service = NotificationServiceImpl::new(
            Arc::new(notifications),
            Arc::new(MockUserRepository::new()),
        );
        service
            .payment_succeeded(parent_id, "Ada", Amount::from_major(5_000))
            .await
            .expect("recorded");
    }

    #[tokio::test]
    async fn ticket_events_fan_out_to_every_admin() {
        let admins = vec![admin_user(), admin_user()];
        let mut users = MockUserRepository::new();
        users
            .expect_list_admins()
            .times(1)
            .return_once(move || Ok(admins));
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_insert_many()
            .withf(|batch: &[Notification]| {
                batch.len() == 2 && batch.iter().all(|n| n.kind == NotificationType::Support)
            })
            .times(1)
            .return_once(|_| Ok(()));

        let service =
            NotificationServiceImpl::new(Arc::new(notifications), Arc::new(users));
        service
            .ticket_created("Ngozi Okafor", "Wrong balance")
            .await
            .expect("fanned out");
    }

    #[tokio::test]
    async fn fan_out_with_no_admins_writes_nothing() {
        let mut users = MockUserRepository::new();
        users.expect_list_admins().return_once(|| Ok(Vec::new()));
        let mut notifications = MockNotificationRepository::new();
        notifications.expect_insert_many().times(0);

        let service =
            NotificationServiceImpl::new(Arc::new(notifications), Arc::new(users));
        service
            .parent_replied("Ngozi Okafor", "Wrong balance")
            .await
            .expect("no-op");
    }

    #[tokio::test]
    async fn list_clamps_the_page_size_and_reports_unread() {
        let caller = caller();
        let recipient = caller.id;
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_list_for_recipient()
            .withf(move |id, query: &NotificationListQuery| {
                *id == recipient && query.limit == MAX_PAGE && query.skip == 0
            })
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));
        notifications
            .expect_unread_count()
            .times(1)
            .return_once(|_| Ok(7));

        let service = NotificationServiceImpl::new(
            Arc::new(notifications),
            Arc::new(MockUserRepository::new()),
        );
        let page = service
            .list(
                &caller,
                NotificationQuery {
                    limit: 5_000,
                    skip: -3,
                    unread_only: false,
                },
            )
            .await
            .expect("listing succeeds");
        assert_eq!(page.unread, 7);
    }

    #[tokio::test]
    async fn marking_an_unowned_notification_reads_as_not_found() {
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_mark_read()
            .times(1)
            .return_once(|_, _| Ok(false));

        let service = NotificationServiceImpl::new(
            Arc::new(notifications),
            Arc::new(MockUserRepository::new()),
        );
        let error = service
            .mark_read(&caller(), NotificationId::random())
            .await
            .expect_err("hidden");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
