//! Driving port for the payment lifecycle.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Amount, Caller, Error, Payment, PaymentId, PaymentStatus, StudentId};

/// Payload for initiating a gateway payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitiatePaymentRequest {
    pub student_id: StudentId,
    pub amount: Amount,
    #[serde(default = "default_payment_type")]
    pub payment_type: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

fn default_payment_type() -> String {
    "lunch_credit".into()
}

/// A pending payment together with its hosted checkout link.
#[derive(Debug, Clone, PartialEq)]
pub struct InitiatedPayment {
    pub payment: Payment,
    pub payment_link: String,
}

/// Identifiers handed back by the gateway redirect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyPaymentRequest {
    pub transaction_id: String,
    pub tx_ref: String,
}

/// Listing filter; an empty filter lists everything the caller may see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentListFilter {
    pub student_id: Option<StudentId>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<String>,
}

/// Payload for an admin recording an out-of-band payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManualPaymentRequest {
    pub student_id: StudentId,
    pub amount: Amount,
    #[serde(default = "default_payment_type")]
    pub payment_type: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Driving port for payments. Parents operate on their own students; the
/// manual-record and status-override operations are admin only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Create a pending payment and open a hosted checkout session.
    async fn initiate(
        &self,
        caller: &Caller,
        request: InitiatePaymentRequest,
    ) -> Result<InitiatedPayment, Error>;

    /// Verify a gateway transaction and credit the student exactly once.
    async fn verify(&self, request: VerifyPaymentRequest) -> Result<Payment, Error>;

    /// List payments visible to the caller.
    async fn list(
        &self,
        caller: &Caller,
        filter: PaymentListFilter,
    ) -> Result<Vec<Payment>, Error>;

    /// Record a completed out-of-band payment, crediting the student.
    async fn record_manual(
        &self,
        caller: &Caller,
        request: ManualPaymentRequest,
    ) -> Result<Payment, Error>;

    /// Force a payment into the given status, reversing an earlier credit
    /// when a completed payment is marked failed.
    async fn override_status(
        &self,
        caller: &Caller,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<Payment, Error>;
}
