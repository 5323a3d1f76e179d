//! Payment HTTP handlers.
//!
//! ```text
//! POST /api/v1/payments/initiate
//! POST /api/v1/payments
//! GET  /api/v1/payments
//! GET  /api/v1/payments/verify
//! PUT  /api/v1/payments/{id}/status
//! ```
//!
//! The verify endpoint is the gateway's browser redirect target: it is
//! unauthenticated and answers with a redirect to the frontend rather than
//! JSON.

use std::str::FromStr;

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    InitiatePaymentRequest, ManualPaymentRequest, PaymentListFilter, VerifyPaymentRequest,
};
use crate::domain::{Amount, Error, Payment, PaymentId, PaymentStatus, StudentId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Request body for initiating or manually recording a payment. Amounts are
/// in kobo.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub student_id: Uuid,
    pub amount: i64,
    #[serde(default = "default_payment_type")]
    pub payment_type: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

fn default_payment_type() -> String {
    "lunch_credit".into()
}

/// Request body for forcing a payment status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusOverrideRequest {
    /// `pending`, `completed` or `failed`.
    pub status: String,
}

/// Payment details returned to clients. Amounts are in kobo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub parent_id: String,
    pub student_id: String,
    pub amount: i64,
    pub payment_type: String,
    pub category: String,
    pub description: Option<String>,
    pub status: String,
    pub gateway_ref: Option<String>,
    pub transaction_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            parent_id: payment.parent_id.to_string(),
            student_id: payment.student_id.to_string(),
            amount: payment.amount.minor(),
            payment_type: payment.payment_type,
            category: payment.category,
            description: payment.description,
            status: payment.status.as_str().to_owned(),
            gateway_ref: payment.gateway_ref,
            transaction_id: payment.transaction_id,
            failure_reason: payment.failure_reason,
            created_at: payment.created_at.to_rfc3339(),
            updated_at: payment.updated_at.to_rfc3339(),
        }
    }
}

/// A pending payment plus its hosted checkout link.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitiatedPaymentResponse {
    pub payment: PaymentResponse,
    pub payment_link: String,
}

/// Listing filter accepted by `GET /api/v1/payments`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListQuery {
    pub student_id: Option<Uuid>,
    pub status: Option<String>,
    pub payment_type: Option<String>,
}

/// Query parameters appended by the gateway redirect. Field names follow the
/// gateway's convention.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub status: Option<String>,
    pub tx_ref: Option<String>,
    pub transaction_id: Option<String>,
}

fn parse_payment_status(raw: &str) -> ApiResult<PaymentStatus> {
    PaymentStatus::from_str(raw).map_err(|_| {
        invalid_value_error(
            FieldName::new("status"),
            raw,
            "pending, completed or failed",
        )
    })
}

fn frontend_redirect(
    state: &HttpState,
    outcome: &str,
    key: &str,
    value: &str,
) -> ApiResult<HttpResponse> {
    let mut target = state
        .public_base_url
        .join(&format!("parent/payments/{outcome}"))
        .map_err(|error| Error::internal(format!("invalid public base URL: {error}")))?;
    target.query_pairs_mut().append_pair(key, value);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, target.to_string()))
        .finish())
}

fn success_redirect(state: &HttpState, payment_id: PaymentId) -> ApiResult<HttpResponse> {
    frontend_redirect(state, "success", "paymentId", &payment_id.to_string())
}

fn error_redirect(state: &HttpState, message: &str) -> ApiResult<HttpResponse> {
    frontend_redirect(state, "error", "message", message)
}

/// Open a hosted checkout session for a lunch wallet top-up.
#[utoipa::path(
    post,
    path = "/api/v1/payments/initiate",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Pending payment created", body = InitiatedPaymentResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error),
        (status = 503, description = "Payment gateway unreachable", body = crate::domain::Error)
    ),
    tags = ["payments"],
    operation_id = "initiatePayment"
)]
#[post("/payments/initiate")]
pub async fn initiate_payment(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<PaymentRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let initiated = state
        .payments
        .initiate(
            auth.caller(),
            InitiatePaymentRequest {
                student_id: StudentId::from_uuid(payload.student_id),
                amount: Amount::from_minor(payload.amount),
                payment_type: payload.payment_type,
                category: payload.category,
                description: payload.description,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(InitiatedPaymentResponse {
        payment: initiated.payment.into(),
        payment_link: initiated.payment_link,
    }))
}

/// List payments visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(
        ("studentId" = Option<Uuid>, Query, description = "Limit to one student"),
        ("status" = Option<String>, Query, description = "pending, completed or failed"),
        ("paymentType" = Option<String>, Query, description = "Payment type filter")
    ),
    responses(
        (status = 200, description = "Visible payments", body = [PaymentResponse]),
        (status = 400, description = "Invalid filter", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<PaymentListQuery>,
) -> ApiResult<web::Json<Vec<PaymentResponse>>> {
    let query = query.into_inner();
    let status = query.status.as_deref().map(parse_payment_status).transpose()?;
    let payments = state
        .payments
        .list(
            auth.caller(),
            PaymentListFilter {
                student_id: query.student_id.map(StudentId::from_uuid),
                status,
                payment_type: query.payment_type,
            },
        )
        .await?;
    Ok(web::Json(
        payments.into_iter().map(PaymentResponse::from).collect(),
    ))
}

/// Gateway redirect target: verify the transaction and send the browser back
/// to the frontend.
#[utoipa::path(
    get,
    path = "/api/v1/payments/verify",
    params(
        ("status" = Option<String>, Query, description = "Gateway-reported checkout status"),
        ("tx_ref" = Option<String>, Query, description = "Merchant payment reference"),
        ("transaction_id" = Option<String>, Query, description = "Gateway transaction identifier")
    ),
    responses(
        (status = 303, description = "Redirect to the frontend result page"),
        (status = 400, description = "Missing gateway identifiers", body = crate::domain::Error)
    ),
    security([]),
    tags = ["payments"],
    operation_id = "verifyPayment"
)]
#[get("/payments/verify")]
pub async fn verify_payment(
    state: web::Data<HttpState>,
    query: web::Query<VerifyQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let (Some(tx_ref), Some(transaction_id)) = (query.tx_ref, query.transaction_id) else {
        tracing::warn!(status = ?query.status, "gateway redirect missing identifiers");
        return Err(Error::invalid_request(
            "tx_ref and transaction_id are required",
        ));
    };
    if query.status.as_deref() == Some("cancelled") {
        return error_redirect(&state, "payment was cancelled");
    }

    match state
        .payments
        .verify(VerifyPaymentRequest {
            transaction_id,
            tx_ref,
        })
        .await
    {
        Ok(payment) if payment.status == PaymentStatus::Completed => {
            success_redirect(&state, payment.id)
        }
        Ok(payment) => {
            let message = payment
                .failure_reason
                .unwrap_or_else(|| "payment was not completed".to_owned());
            error_redirect(&state, &message)
        }
        Err(error) => {
            tracing::warn!(error = %error, "payment verification failed");
            error_redirect(&state, &error.to_string())
        }
    }
}

/// Record a completed out-of-band payment for a visible student.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Payment recorded and credited", body = PaymentResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error)
    ),
    tags = ["payments"],
    operation_id = "recordManualPayment"
)]
#[post("/payments")]
pub async fn record_manual_payment(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<PaymentRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let payment = state
        .payments
        .record_manual(
            auth.caller(),
            ManualPaymentRequest {
                student_id: StudentId::from_uuid(payload.student_id),
                amount: Amount::from_minor(payload.amount),
                payment_type: payload.payment_type,
                category: payload.category,
                description: payload.description,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(PaymentResponse::from(payment)))
}

/// Force a payment into a status, reversing credits where needed.
#[utoipa::path(
    put,
    path = "/api/v1/payments/{id}/status",
    request_body = StatusOverrideRequest,
    params(("id" = Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Updated payment", body = PaymentResponse),
        (status = 400, description = "Invalid status", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Payment not found", body = crate::domain::Error),
        (status = 409, description = "Transition not allowed", body = crate::domain::Error)
    ),
    tags = ["payments"],
    operation_id = "overridePaymentStatus"
)]
#[put("/payments/{id}/status")]
pub async fn override_payment_status(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<StatusOverrideRequest>,
) -> ApiResult<web::Json<PaymentResponse>> {
    let status = parse_payment_status(&payload.status)?;
    let payment = state
        .payments
        .override_status(auth.caller(), PaymentId::from_uuid(path.into_inner()), status)
        .await?;
    Ok(web::Json(payment.into()))
}
