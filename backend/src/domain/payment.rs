//! Payment aggregate and its status lifecycle.
//!
//! A payment moves `pending → completed` or `pending → failed`. Completion
//! and its balance credit are one atomic write in the persistence adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

use super::ids::{PaymentId, StudentId, UserId};
use super::money::Amount;

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Parse failure for [`PaymentStatus`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown payment status: {0}")]
pub struct UnknownPaymentStatus(pub String);

impl std::str::FromStr for PaymentStatus {
    type Err = UnknownPaymentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownPaymentStatus(other.to_owned())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A funding payment made by a parent towards a student's balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub parent_id: UserId,
    pub student_id: StudentId,
    pub amount: Amount,
    /// Free-form payment type from the client, e.g. `lunch`.
    pub payment_type: String,
    pub category: String,
    pub description: Option<String>,
    pub status: PaymentStatus,
    /// Reference assigned by the gateway when the hosted session is created.
    pub gateway_ref: Option<String>,
    /// Hosted checkout link returned by the gateway.
    pub payment_link: Option<String>,
    /// Gateway transaction identifier recorded at verification.
    pub transaction_id: Option<String>,
    /// Raw verification payload retained for audit.
    pub gateway_payload: Option<Value>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Build a fresh pending payment for an initiated or manual transaction.
    pub fn new_pending(
        parent_id: UserId,
        student_id: StudentId,
        amount: Amount,
        payment_type: impl Into<String>,
        category: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentId::random(),
            parent_id,
            student_id,
            amount,
            payment_type: payment_type.into(),
            category: category.into(),
            description,
            status: PaymentStatus::Pending,
            gateway_ref: None,
            payment_link: None,
            transaction_id: None,
            gateway_payload: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pending", PaymentStatus::Pending)]
    #[case("completed", PaymentStatus::Completed)]
    #[case("failed", PaymentStatus::Failed)]
    fn status_parses_stable_strings(#[case] raw: &str, #[case] expected: PaymentStatus) {
        assert_eq!(raw.parse::<PaymentStatus>().expect("known status"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("Pending")]
    #[case("refunded")]
    #[case("")]
    fn status_rejects_unknown_strings(#[case] raw: &str) {
        assert!(raw.parse::<PaymentStatus>().is_err());
    }

    #[rstest]
    fn new_pending_payment_has_no_gateway_fields() {
        let payment = Payment::new_pending(
            UserId::random(),
            StudentId::random(),
            Amount::from_major(5_000),
            "lunch",
            "funding",
            None,
        );

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.gateway_ref.is_none());
        assert!(payment.payment_link.is_none());
        assert!(payment.transaction_id.is_none());
        assert!(payment.failure_reason.is_none());
    }
}
