//! Bearer-token authentication for HTTP handlers.
//!
//! Issues and verifies stateless HS256 tokens carrying the caller's sanitised
//! account details. Handlers receive an [`AuthContext`] extractor so they only
//! deal with the domain [`Caller`] and never touch raw headers.

use std::future::{Ready, ready};
use std::str::FromStr;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{Caller, Error, Role, UserId};

const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried inside issued tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    role: String,
    iat: i64,
    exp: i64,
}

/// Encodes and decodes bearer tokens with a shared secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    /// Build a codec from the shared signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for an authenticated caller.
    ///
    /// # Errors
    ///
    /// Returns an internal error when signing fails.
    pub fn issue(&self, caller: &Caller) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: caller.id.to_string(),
            email: caller.email.clone(),
            name: caller.name.clone(),
            phone: caller.phone.clone(),
            role: caller.role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|error| Error::internal(format!("failed to sign token: {error}")))
    }

    /// Verify a token and reconstruct the caller it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `401 Unauthorized` when the token is malformed, has an invalid
    /// signature, or has expired.
    pub fn verify(&self, token: &str) -> Result<Caller, Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| Error::unauthorized("invalid or expired token"))?;
        let claims = data.claims;
        let id = UserId::from_str(&claims.sub)
            .map_err(|_| Error::unauthorized("invalid or expired token"))?;
        let role = Role::from_str(&claims.role)
            .map_err(|_| Error::unauthorized("invalid or expired token"))?;
        Ok(Caller {
            id,
            name: claims.name,
            email: claims.email,
            phone: claims.phone,
            role,
        })
    }
}

/// The authenticated principal for the current request.
#[derive(Debug, Clone)]
pub struct AuthContext(Caller);

impl AuthContext {
    /// The verified caller.
    pub fn caller(&self) -> &Caller {
        &self.0
    }

    /// Consume the context, yielding the caller.
    pub fn into_caller(self) -> Caller {
        self.0
    }

    /// Require the admin role or return `403 Forbidden`.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.0.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("admin access required"))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("login required"))?;
    let raw = header_value
        .to_str()
        .map_err(|_| Error::unauthorized("invalid authorisation header"))?;
    raw.strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("invalid authorisation header"))
}

fn authenticate(req: &HttpRequest) -> Result<AuthContext, Error> {
    let codec = req
        .app_data::<web::Data<TokenCodec>>()
        .ok_or_else(|| Error::internal("token codec not configured"))?;
    let token = bearer_token(req)?;
    codec.verify(token).map(AuthContext)
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
