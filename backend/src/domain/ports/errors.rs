//! Error types shared by driven ports.

use thiserror::Error;

/// Persistence failures surfaced by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Connection pool exhaustion or dropped connections.
    #[error("repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query { message: String },
    /// A unique constraint rejected the write.
    #[error("duplicate value for {field}")]
    DuplicateKey { field: String },
}

impl RepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-constraint violations.
    pub fn duplicate_key(field: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field: field.into(),
        }
    }
}

/// Failures surfaced by the payment gateway adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Network-level failure reaching the gateway.
    #[error("gateway transport failed: {message}")]
    Transport { message: String },
    /// The request exceeded the configured timeout.
    #[error("gateway request timed out: {message}")]
    Timeout { message: String },
    /// The gateway answered but rejected the operation.
    #[error("gateway declined the request: {message}")]
    Declined { message: String },
    /// The gateway response could not be decoded.
    #[error("gateway response decoding failed: {message}")]
    Decode { message: String },
    /// The request was malformed before it left this service.
    #[error("gateway request invalid: {message}")]
    InvalidRequest { message: String },
}

impl GatewayError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for gateway-side rejections.
    pub fn declined(message: impl Into<String>) -> Self {
        Self::Declined {
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Helper for malformed outbound requests.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
