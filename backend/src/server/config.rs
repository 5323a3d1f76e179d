//! HTTP server configuration drawn from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;
use url::Url;

use crate::domain::Amount;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GATEWAY_URL: &str = "https://api.flutterwave.com/v3/";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
/// 1,000 naira in kobo.
const DEFAULT_DAILY_RATE_KOBO: i64 = 100_000;

/// Everything the server needs to start, resolved up front so a
/// misconfigured deployment fails at boot rather than on first request.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub auth_token_secret: String,
    /// When unset, admin registration is disabled entirely.
    pub admin_registration_code: Option<String>,
    pub gateway_base_url: Url,
    pub gateway_secret: String,
    /// Externally visible base URL for checkout redirects.
    pub public_base_url: Url,
    pub upload_dir: PathBuf,
    pub daily_rate: Amount,
}

fn required(name: &str) -> std::io::Result<String> {
    std::env::var(name)
        .map_err(|_| std::io::Error::other(format!("missing required environment variable {name}")))
}

fn parse_env<T: std::str::FromStr>(name: &str, default: &str) -> std::io::Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_owned());
    raw.parse()
        .map_err(|error| std::io::Error::other(format!("invalid {name} ({raw}): {error}")))
}

impl ServerConfig {
    /// Resolve configuration from the environment.
    ///
    /// Debug builds fall back to an ephemeral token secret so local
    /// development needs no setup; release builds fail closed.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> std::io::Result<Self> {
        let auth_token_secret = match std::env::var("AUTH_TOKEN_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if cfg!(debug_assertions) => {
                warn!("AUTH_TOKEN_SECRET unset; using an ephemeral secret (dev only)");
                uuid::Uuid::new_v4().to_string()
            }
            _ => {
                return Err(std::io::Error::other(
                    "missing required environment variable AUTH_TOKEN_SECRET",
                ));
            }
        };

        let daily_rate_kobo: i64 =
            parse_env("DAILY_LUNCH_RATE_KOBO", &DEFAULT_DAILY_RATE_KOBO.to_string())?;
        if daily_rate_kobo <= 0 {
            return Err(std::io::Error::other(
                "DAILY_LUNCH_RATE_KOBO must be positive",
            ));
        }

        Ok(Self {
            bind_addr: parse_env("BIND_ADDR", DEFAULT_BIND_ADDR)?,
            database_url: required("DATABASE_URL")?,
            auth_token_secret,
            admin_registration_code: std::env::var("ADMIN_REGISTRATION_CODE")
                .ok()
                .filter(|code| !code.is_empty()),
            gateway_base_url: parse_env("PAYMENT_GATEWAY_URL", DEFAULT_GATEWAY_URL)?,
            gateway_secret: required("PAYMENT_GATEWAY_SECRET")?,
            public_base_url: parse_env("PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL)?,
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_owned()),
            ),
            daily_rate: Amount::from_minor(daily_rate_kobo),
        })
    }

    /// Absolute URL of the payment verification endpoint handed to the
    /// gateway as the checkout redirect target.
    pub fn verify_redirect_url(&self) -> std::io::Result<String> {
        self.public_base_url
            .join("api/v1/payments/verify")
            .map(|url| url.to_string())
            .map_err(|error| std::io::Error::other(format!("invalid PUBLIC_BASE_URL: {error}")))
    }
}
