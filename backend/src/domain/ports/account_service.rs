//! Driving port for account registration and login.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Caller, Error, Role};

/// Payload for registering a new account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
    /// Required when `role` is [`Role::Admin`]; checked against the
    /// configured registration code.
    pub admin_code: Option<String>,
}

/// Payload for logging in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Driving port for account lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new parent or admin account.
    async fn register(&self, request: RegisterAccountRequest) -> Result<Caller, Error>;

    /// Authenticate by email and password.
    async fn login(&self, request: LoginRequest) -> Result<Caller, Error>;
}
