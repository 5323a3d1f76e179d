//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/register
//! POST /api/v1/auth/login
//! GET  /api/v1/auth/me
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Caller, Error, Role};
use crate::domain::ports::{LoginRequest, RegisterAccountRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthContext, TokenCodec};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// `parent` (default) or `admin`.
    #[serde(default = "default_role")]
    pub role: String,
    /// Required when registering an admin account.
    pub admin_code: Option<String>,
}

fn default_role() -> String {
    "parent".into()
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Sanitised account view returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
}

impl From<Caller> for CallerResponse {
    fn from(caller: Caller) -> Self {
        Self {
            id: caller.id.to_string(),
            name: caller.name,
            email: caller.email,
            phone: caller.phone,
            role: caller.role.as_str().to_owned(),
        }
    }
}

/// Token plus account details returned on registration and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: CallerResponse,
}

fn parse_role(raw: &str) -> Result<Role, Error> {
    Role::from_str(raw)
        .map_err(|_| invalid_value_error(FieldName::new("role"), raw, "parent or admin"))
}

fn auth_response(codec: &TokenCodec, caller: Caller) -> Result<AuthResponse, Error> {
    let token = codec.issue(&caller)?;
    Ok(AuthResponse {
        token,
        user: caller.into(),
    })
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request or email already registered", body = crate::domain::Error),
        (status = 403, description = "Invalid admin registration code", body = crate::domain::Error)
    ),
    security([]),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    codec: web::Data<TokenCodec>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let role = parse_role(&payload.role)?;
    let caller = state
        .accounts
        .register(RegisterAccountRequest {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            phone: payload.phone,
            role,
            admin_code: payload.admin_code,
        })
        .await?;
    Ok(HttpResponse::Created().json(auth_response(&codec, caller)?))
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::domain::Error)
    ),
    security([]),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    codec: web::Data<TokenCodec>,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<AuthResponse>> {
    let payload = payload.into_inner();
    let caller = state
        .accounts
        .login(LoginRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;
    Ok(web::Json(auth_response(&codec, caller)?))
}

/// Fetch the authenticated account.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = CallerResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn current_account(auth: AuthContext) -> ApiResult<web::Json<CallerResponse>> {
    Ok(web::Json(auth.into_caller().into()))
}
