//! DTOs for the hosted payment gateway wire format.
//!
//! The adapter serialises checkout requests into these transport DTOs and
//! decodes gateway envelopes back into domain records in one pass. All
//! monetary amounts cross the wire in minor units (kobo).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Amount;
use crate::domain::ports::{CreateSessionRequest, GatewaySession, VerifiedTransaction};

#[derive(Debug, Serialize)]
pub(super) struct CreatePaymentRequestDto<'a> {
    pub(super) tx_ref: &'a str,
    pub(super) amount: i64,
    pub(super) currency: &'a str,
    pub(super) redirect_url: &'a str,
    pub(super) customer: CustomerDto<'a>,
    pub(super) customizations: CustomizationsDto<'a>,
    pub(super) meta: &'a Value,
}

#[derive(Debug, Serialize)]
pub(super) struct CustomerDto<'a> {
    pub(super) email: &'a str,
    pub(super) name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) phonenumber: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct CustomizationsDto<'a> {
    pub(super) title: &'a str,
    pub(super) description: &'a str,
}

impl<'a> CreatePaymentRequestDto<'a> {
    pub(super) fn from_domain(request: &'a CreateSessionRequest) -> Self {
        Self {
            tx_ref: &request.tx_ref,
            amount: request.amount.minor(),
            currency: &request.currency,
            redirect_url: &request.redirect_url,
            customer: CustomerDto {
                email: &request.customer.email,
                name: &request.customer.name,
                phonenumber: request.customer.phone.as_deref(),
            },
            customizations: CustomizationsDto {
                title: &request.title,
                description: &request.description,
            },
            meta: &request.meta,
        }
    }
}

/// Envelope wrapping every gateway response body.
#[derive(Debug, Deserialize)]
pub(super) struct EnvelopeDto<T> {
    pub(super) status: String,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default = "Option::default")]
    pub(super) data: Option<T>,
}

impl<T> EnvelopeDto<T> {
    pub(super) fn is_success(&self) -> bool {
        self.status == "success"
    }

    pub(super) fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_owned())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedSessionDto {
    pub(super) link: String,
    #[serde(default)]
    pub(super) id: Option<i64>,
}

impl CreatedSessionDto {
    pub(super) fn into_domain(self) -> GatewaySession {
        GatewaySession {
            payment_link: self.link,
            gateway_ref: self.id.map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifiedTransactionDto {
    pub(super) id: i64,
    pub(super) tx_ref: String,
    pub(super) amount: i64,
    pub(super) currency: String,
    pub(super) status: String,
}

impl VerifiedTransactionDto {
    pub(super) fn into_domain(self, raw: Value) -> VerifiedTransaction {
        VerifiedTransaction {
            transaction_id: self.id.to_string(),
            tx_ref: self.tx_ref,
            amount: Amount::from_minor(self.amount),
            currency: self.currency,
            successful: self.status == "successful",
            raw,
        }
    }
}
