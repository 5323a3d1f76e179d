//! Notification inbox HTTP handlers.
//!
//! ```text
//! GET  /api/v1/notifications
//! POST /api/v1/notifications
//! ```
//!
//! Mutations travel in an action envelope rather than per-action routes:
//! `markAsRead` with an identifier marks one notification, without one it
//! sweeps the whole inbox, and `delete` removes one notification.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{NotificationPage, NotificationQuery};
use crate::domain::{Error, Notification, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Inbox listing parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    #[serde(default)]
    pub unread_only: bool,
}

/// One stored notification.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub priority: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            title: notification.title,
            body: notification.body,
            kind: notification.kind.as_str().to_owned(),
            priority: notification.priority.as_str().to_owned(),
            read: notification.read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// One inbox page plus the total unread count.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboxPageResponse {
    pub items: Vec<NotificationResponse>,
    pub unread: i64,
}

impl From<NotificationPage> for InboxPageResponse {
    fn from(page: NotificationPage) -> Self {
        Self {
            items: page
                .items
                .into_iter()
                .map(NotificationResponse::from)
                .collect(),
            unread: page.unread,
        }
    }
}

/// Mutation envelope accepted by `POST /api/v1/notifications`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationActionRequest {
    /// `markAsRead` or `delete`.
    pub action: String,
    /// Target notification; `markAsRead` without one sweeps the inbox.
    pub notification_id: Option<Uuid>,
}

/// Count of notifications marked read in one sweep.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadAllResponse {
    pub updated: u64,
}

/// Page through the caller's inbox, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, capped server-side"),
        ("skip" = Option<i64>, Query, description = "Offset into the inbox"),
        ("unreadOnly" = Option<bool>, Query, description = "Only unread notifications")
    ),
    responses(
        (status = 200, description = "Inbox page", body = InboxPageResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<InboxQuery>,
) -> ApiResult<web::Json<InboxPageResponse>> {
    let query = query.into_inner();
    let defaults = NotificationQuery::default();
    let page = state
        .notifications
        .list(
            auth.caller(),
            NotificationQuery {
                limit: query.limit.unwrap_or(defaults.limit),
                skip: query.skip.unwrap_or(defaults.skip),
                unread_only: query.unread_only,
            },
        )
        .await?;
    Ok(web::Json(page.into()))
}

/// Apply a `markAsRead` or `delete` action to the caller's inbox.
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    request_body = NotificationActionRequest,
    responses(
        (status = 200, description = "Count of notifications swept", body = ReadAllResponse),
        (status = 204, description = "Action applied to one notification"),
        (status = 400, description = "Unknown action or missing identifier", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Notification not found", body = crate::domain::Error)
    ),
    tags = ["notifications"],
    operation_id = "applyNotificationAction"
)]
#[post("/notifications")]
pub async fn apply_notification_action(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<NotificationActionRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    match (payload.action.as_str(), payload.notification_id) {
        ("markAsRead", Some(id)) => {
            state
                .notifications
                .mark_read(auth.caller(), NotificationId::from_uuid(id))
                .await?;
            Ok(HttpResponse::NoContent().finish())
        }
        ("markAsRead", None) => {
            let updated = state.notifications.mark_all_read(auth.caller()).await?;
            Ok(HttpResponse::Ok().json(ReadAllResponse { updated }))
        }
        ("delete", Some(id)) => {
            state
                .notifications
                .delete(auth.caller(), NotificationId::from_uuid(id))
                .await?;
            Ok(HttpResponse::NoContent().finish())
        }
        ("delete", None) => Err(Error::invalid_request(
            "notificationId is required to delete",
        )),
        (other, _) => Err(invalid_value_error(
            FieldName::new("action"),
            other,
            "markAsRead or delete",
        )),
    }
}
