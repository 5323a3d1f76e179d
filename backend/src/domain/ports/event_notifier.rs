//! Port for recording domain events as stored notifications.

use async_trait::async_trait;

use crate::domain::{Amount, Error, UserId};

/// Records noteworthy domain events so affected accounts see them in their
/// notification inbox. Implementations decide recipients: parent-facing
/// events target the parent, operational events fan out to every admin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventNotifier: Send + Sync {
    /// A payment completed and the student's balance was credited.
    async fn payment_succeeded(
        &self,
        parent_id: UserId,
        student_name: &str,
        amount: Amount,
    ) -> Result<(), Error>;

    /// A payment could not be completed.
    async fn payment_failed(
        &self,
        parent_id: UserId,
        student_name: &str,
        amount: Amount,
        reason: &str,
    ) -> Result<(), Error>;

    /// A student's balance dropped below the daily lunch rate.
    async fn low_balance(
        &self,
        parent_id: UserId,
        student_name: &str,
        balance: Amount,
    ) -> Result<(), Error>;

    /// Lunch was served and the student's balance was debited.
    async fn lunch_served(
        &self,
        parent_id: UserId,
        student_name: &str,
        amount: Amount,
        balance_after: Amount,
    ) -> Result<(), Error>;

    /// A parent registered a new student.
    async fn student_added(&self, parent_id: UserId, student_name: &str) -> Result<(), Error>;

    /// A parent opened a support ticket; notifies admins.
    async fn ticket_created(&self, parent_name: &str, subject: &str) -> Result<(), Error>;

    /// A parent replied on an existing ticket; notifies admins.
    async fn parent_replied(&self, parent_name: &str, subject: &str) -> Result<(), Error>;

    /// An admin responded on a ticket; notifies the parent.
    async fn ticket_responded(&self, parent_id: UserId, subject: &str) -> Result<(), Error>;

    /// An admin adjusted a payment and the balance changed.
    async fn balance_updated(
        &self,
        parent_id: UserId,
        student_name: &str,
        amount: Amount,
    ) -> Result<(), Error>;
}
