//! Account registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::map_repo_error;
use crate::domain::ports::{AccountService, LoginRequest, RegisterAccountRequest, UserRepository};
use crate::domain::{Caller, Error, Role, User, UserId};

const MIN_PASSWORD_LEN: usize = 6;
const BCRYPT_COST: u32 = 12;

/// Account service backed by the user repository. Passwords are stored as
/// bcrypt hashes and never leave this module in the clear.
#[derive(Clone)]
pub struct AccountServiceImpl<U> {
    users: Arc<U>,
    /// Shared secret required to register an admin account. `None` disables
    /// admin self-registration entirely.
    admin_registration_code: Option<String>,
}

impl<U> AccountServiceImpl<U> {
    pub fn new(users: Arc<U>, admin_registration_code: Option<String>) -> Self {
        Self {
            users,
            admin_registration_code,
        }
    }
}

impl<U> AccountServiceImpl<U>
where
    U: UserRepository,
{
    fn validate_registration(&self, request: &RegisterAccountRequest) -> Result<(), Error> {
        if request.name.trim().is_empty() {
            return Err(Error::invalid_request("name must not be empty"));
        }
        if !request.email.contains('@') {
            return Err(Error::invalid_request("email is not valid"));
        }
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(Error::invalid_request(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if request.role == Role::Admin {
            let supplied = request.admin_code.as_deref().unwrap_or_default();
            let expected = self.admin_registration_code.as_deref();
            if expected.is_none() || expected != Some(supplied) {
                return Err(Error::forbidden("invalid admin registration code"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U> AccountService for AccountServiceImpl<U>
where
    U: UserRepository,
{
    async fn register(&self, request: RegisterAccountRequest) -> Result<Caller, Error> {
        self.validate_registration(&request)?;

        let email = request.email.trim().to_lowercase();
        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(|err| map_repo_error("user", err))?
            .is_some()
        {
            return Err(Error::invalid_request("email already registered"));
        }

        let password_hash = bcrypt::hash(&request.password, BCRYPT_COST)
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;

        let user = User {
            id: UserId::random(),
            name: request.name.trim().to_owned(),
            email,
            phone: request.phone,
            role: request.role,
            password_hash,
            created_at: Utc::now(),
        };

        self.users
            .insert(&user)
            .await
            .map_err(|err| map_repo_error("user", err))?;

        tracing::info!(user_id = %user.id, role = %user.role, "account registered");
        Ok(user.to_caller())
    }

    async fn login(&self, request: LoginRequest) -> Result<Caller, Error> {
        let email = request.email.trim().to_lowercase();
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|err| map_repo_error("user", err))?
        else {
            return Err(Error::unauthorized("invalid email or password"));
        };

        let matches = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|err| Error::internal(format!("password verification failed: {err}")))?;
        if !matches {
            return Err(Error::unauthorized("invalid email or password"));
        }

        Ok(user.to_caller())
    }
}
