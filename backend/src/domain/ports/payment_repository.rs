//! Persistence port for the payment lifecycle.

use async_trait::async_trait;
use serde_json::Value;

use super::errors::RepositoryError;
use crate::domain::{Amount, Payment, PaymentId, PaymentStatus, StudentId, UserId};

/// Listing filter; `None` fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilter {
    pub parent_id: Option<UserId>,
    pub student_id: Option<StudentId>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<String>,
}

/// Persistence port for payments.
///
/// The compensating writes of the lifecycle (completion credit, manual-record
/// credit, failure reversal) are single operations here so adapters can wrap
/// each in one database transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a pending payment.
    async fn insert(&self, payment: &Payment) -> Result<(), RepositoryError>;

    /// Fetch a payment by identifier (the gateway's `tx_ref`).
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError>;

    /// List payments matching the filter, newest first.
    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>, RepositoryError>;

    /// Record the hosted checkout session returned by the gateway.
    async fn record_gateway_session<'a>(
        &self,
        id: PaymentId,
        gateway_ref: Option<&'a str>,
        payment_link: &str,
    ) -> Result<(), RepositoryError>;

    /// Mark a payment failed with the gateway's reason.
    async fn mark_failed(&self, id: PaymentId, reason: &str) -> Result<(), RepositoryError>;

    /// Complete a verified payment and credit the student balance, stamping
    /// the last-payment time, in one transaction.
    async fn complete_with_credit(
        &self,
        id: PaymentId,
        student_id: StudentId,
        amount: Amount,
        transaction_id: &str,
        payload: &Value,
    ) -> Result<(), RepositoryError>;

    /// Insert an already-completed manual payment and credit the balance in
    /// one transaction.
    async fn insert_completed_with_credit(&self, payment: &Payment) -> Result<(), RepositoryError>;

    /// Overwrite the status; when `reversal` is set the student balance is
    /// debited by that amount in the same transaction.
    async fn set_status(
        &self,
        id: PaymentId,
        status: PaymentStatus,
        reversal: Option<(StudentId, Amount)>,
    ) -> Result<(), RepositoryError>;
}
