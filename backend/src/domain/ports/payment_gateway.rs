//! Outbound port for the hosted payment gateway.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::GatewayError;
use crate::domain::Amount;

/// Customer details forwarded to the hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayCustomer {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Request to open a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSessionRequest {
    /// Merchant-side reference, echoed back on verification.
    pub tx_ref: String,
    pub amount: Amount,
    pub currency: String,
    /// Where the gateway sends the customer after checkout.
    pub redirect_url: String,
    pub customer: GatewayCustomer,
    pub title: String,
    pub description: String,
    /// Opaque metadata round-tripped through the gateway.
    pub meta: Value,
}

/// A freshly created checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySession {
    /// Hosted page the customer is redirected to.
    pub payment_link: String,
    /// Gateway-side identifier for the session, when one is issued.
    pub gateway_ref: Option<String>,
}

/// Outcome of verifying a transaction with the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedTransaction {
    pub transaction_id: String,
    pub tx_ref: String,
    pub amount: Amount,
    pub currency: String,
    pub successful: bool,
    /// Full gateway response body, retained for audit.
    pub raw: Value,
}

/// Port for the external payment gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session and return its payment link.
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<GatewaySession, GatewayError>;

    /// Verify a transaction by its gateway-side identifier.
    async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<VerifiedTransaction, GatewayError>;
}
