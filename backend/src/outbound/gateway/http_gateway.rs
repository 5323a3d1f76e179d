//! Reqwest-backed payment gateway adapter.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! authentication, timeout and HTTP error mapping, and JSON decoding into
//! domain session and transaction records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use super::dto::{CreatePaymentRequestDto, CreatedSessionDto, EnvelopeDto, VerifiedTransactionDto};
use crate::domain::ports::{
    CreateSessionRequest, GatewayError, GatewaySession, PaymentGateway, VerifiedTransaction,
};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Payment gateway adapter speaking the hosted-checkout HTTP API.
pub struct FlutterwaveHttpGateway {
    client: Client,
    base: Url,
    secret_key: String,
}

impl FlutterwaveHttpGateway {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, secret_key: String) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base, secret_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        base: Url,
        secret_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            secret_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base.join(path).map_err(|error| {
            GatewayError::invalid_request(format!("invalid gateway endpoint {path}: {error}"))
        })
    }

    async fn read_success_body(
        &self,
        response: reqwest::Response,
    ) -> Result<Vec<u8>, GatewayError> {
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl PaymentGateway for FlutterwaveHttpGateway {
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<GatewaySession, GatewayError> {
        let endpoint = self.endpoint("payments")?;
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.secret_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&CreatePaymentRequestDto::from_domain(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = self.read_success_body(response).await?;
        parse_session(&body)
    }

    async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<VerifiedTransaction, GatewayError> {
        let endpoint = self.endpoint(&format!("transactions/{transaction_id}/verify"))?;
        let response = self
            .client
            .get(endpoint)
            .bearer_auth(&self.secret_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = self.read_success_body(response).await?;
        parse_verification(&body)
    }
}

fn parse_session(body: &[u8]) -> Result<GatewaySession, GatewayError> {
    let envelope: EnvelopeDto<CreatedSessionDto> = serde_json::from_slice(body)
        .map_err(|error| GatewayError::decode(format!("invalid session payload: {error}")))?;
    if !envelope.is_success() {
        return Err(GatewayError::declined(
            envelope.message_or("checkout session rejected"),
        ));
    }
    envelope
        .data
        .map(CreatedSessionDto::into_domain)
        .ok_or_else(|| GatewayError::decode("session response missing data"))
}

fn parse_verification(body: &[u8]) -> Result<VerifiedTransaction, GatewayError> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|error| GatewayError::decode(format!("invalid verification payload: {error}")))?;
    let envelope: EnvelopeDto<VerifiedTransactionDto> = serde_json::from_value(raw.clone())
        .map_err(|error| GatewayError::decode(format!("invalid verification payload: {error}")))?;
    if !envelope.is_success() {
        return Err(GatewayError::declined(
            envelope.message_or("transaction lookup rejected"),
        ));
    }
    envelope
        .data
        .map(|data| data.into_domain(raw))
        .ok_or_else(|| GatewayError::decode("verification response missing data"))
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::timeout(message),
        StatusCode::PAYMENT_REQUIRED | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::declined(message)
        }
        _ if status.is_client_error() => GatewayError::invalid_request(message),
        _ => GatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
