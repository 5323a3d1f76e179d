//! Support ticket HTTP handlers.
//!
//! ```text
//! GET   /api/v1/support/tickets
//! POST  /api/v1/support/tickets            (multipart, optional attachment)
//! POST  /api/v1/support/tickets/{id}/reply
//! POST  /api/v1/support/tickets/{id}/respond
//! PATCH /api/v1/support/tickets/{id}/status
//! ```

use std::path::Path;
use std::str::FromStr;

use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_web::{HttpResponse, get, patch, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::NewTicketRequest;
use crate::domain::{
    Error, TicketId, TicketPriority, TicketReply, TicketStatus, TicketWithReplies,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, missing_field_error};

/// Multipart form accepted by `POST /api/v1/support/tickets`. One struct
/// drives both the extractor and the OpenAPI schema, so the documented
/// shape is the parsed shape.
#[derive(MultipartForm, ToSchema)]
pub struct TicketForm {
    #[schema(value_type = String)]
    subject: Text<String>,
    #[schema(value_type = String)]
    message: Text<String>,
    /// `low`, `medium` (default) or `high`.
    #[schema(value_type = Option<String>)]
    priority: Option<Text<String>>,
    /// Optional file attachment.
    #[multipart(limit = "5MB")]
    #[schema(value_type = Option<String>, format = Binary)]
    attachment: Option<TempFile>,
}

/// Request body carrying a reply or response message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub message: String,
}

/// Request body for setting a ticket's status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatusBody {
    /// `open`, `in_progress`, `resolved` or `closed`.
    pub status: String,
}

/// One reply in a ticket thread.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: String,
    pub author: String,
    pub message: String,
    pub created_at: String,
}

impl From<TicketReply> for ReplyResponse {
    fn from(reply: TicketReply) -> Self {
        Self {
            id: reply.id.to_string(),
            author: reply.author.as_str().to_owned(),
            message: reply.message,
            created_at: reply.created_at.to_rfc3339(),
        }
    }
}

/// Ticket details with the reply thread.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: String,
    pub parent_id: String,
    pub subject: String,
    pub message: String,
    pub priority: String,
    pub status: String,
    pub attachment_path: Option<String>,
    pub admin_response: Option<String>,
    pub admin_response_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub replies: Vec<ReplyResponse>,
}

impl From<TicketWithReplies> for TicketResponse {
    fn from(thread: TicketWithReplies) -> Self {
        let ticket = thread.ticket;
        Self {
            id: ticket.id.to_string(),
            parent_id: ticket.parent_id.to_string(),
            subject: ticket.subject,
            message: ticket.message,
            priority: ticket.priority.as_str().to_owned(),
            status: ticket.status.as_str().to_owned(),
            attachment_path: ticket.attachment_path,
            admin_response: ticket.admin_response,
            admin_response_at: ticket.admin_response_at.map(|at| at.to_rfc3339()),
            created_at: ticket.created_at.to_rfc3339(),
            updated_at: ticket.updated_at.to_rfc3339(),
            replies: thread.replies.into_iter().map(ReplyResponse::from).collect(),
        }
    }
}

fn parse_priority(raw: &str) -> ApiResult<TicketPriority> {
    TicketPriority::from_str(raw).map_err(|_| {
        invalid_value_error(FieldName::new("priority"), raw, "low, medium or high")
    })
}

fn parse_ticket_status(raw: &str) -> ApiResult<TicketStatus> {
    TicketStatus::from_str(raw).map_err(|_| {
        invalid_value_error(
            FieldName::new("status"),
            raw,
            "open, in_progress, resolved or closed",
        )
    })
}

/// Stored filename for an uploaded attachment: collision-free and stripped
/// of the client-supplied name apart from a sanitised extension.
fn attachment_filename(original: &str) -> String {
    let extension = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(char::is_alphanumeric) && ext.len() <= 10)
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();
    format!(
        "{}-{}{extension}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

async fn store_attachment(state: &HttpState, file: TempFile) -> ApiResult<String> {
    let original = file.file_name.as_deref().unwrap_or_default();
    let path = state.upload_dir.join(attachment_filename(original));
    // The upload dir can sit on a different filesystem than the temp file,
    // so copy instead of renaming.
    tokio::fs::copy(file.file.path(), &path)
        .await
        .map_err(|error| Error::internal(format!("failed to store attachment: {error}")))?;
    Ok(path.to_string_lossy().into_owned())
}

/// List tickets visible to the caller, with their reply threads.
#[utoipa::path(
    get,
    path = "/api/v1/support/tickets",
    responses(
        (status = 200, description = "Visible tickets", body = [TicketResponse]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["support"],
    operation_id = "listTickets"
)]
#[get("/support/tickets")]
pub async fn list_tickets(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<Vec<TicketResponse>>> {
    let tickets = state.support.list(auth.caller()).await?;
    Ok(web::Json(
        tickets.into_iter().map(TicketResponse::from).collect(),
    ))
}

/// Open a support ticket, optionally attaching one file.
#[utoipa::path(
    post,
    path = "/api/v1/support/tickets",
    request_body(content = TicketForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Ticket created", body = TicketResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["support"],
    operation_id = "createTicket"
)]
#[post("/support/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    auth: AuthContext,
    MultipartForm(form): MultipartForm<TicketForm>,
) -> ApiResult<HttpResponse> {
    let subject = form.subject.into_inner();
    if subject.trim().is_empty() {
        return Err(missing_field_error(FieldName::new("subject")));
    }
    let message = form.message.into_inner();
    if message.trim().is_empty() {
        return Err(missing_field_error(FieldName::new("message")));
    }
    let priority = match form.priority.map(Text::into_inner) {
        Some(raw) if !raw.trim().is_empty() => parse_priority(raw.trim())?,
        _ => TicketPriority::default(),
    };
    let attachment_path = match form.attachment {
        Some(file) => Some(store_attachment(&state, file).await?),
        None => None,
    };

    let ticket = state
        .support
        .create(
            auth.caller(),
            NewTicketRequest {
                subject,
                message,
                priority,
                attachment_path,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(ticket)))
}

/// Append a parent reply to an owned ticket; reopens it.
#[utoipa::path(
    post,
    path = "/api/v1/support/tickets/{id}/reply",
    request_body = MessageBody,
    params(("id" = Uuid, Path, description = "Ticket identifier")),
    responses(
        (status = 201, description = "Reply appended", body = TicketResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Ticket not found", body = crate::domain::Error)
    ),
    tags = ["support"],
    operation_id = "replyToTicket"
)]
#[post("/support/tickets/{id}/reply")]
pub async fn reply_to_ticket(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<MessageBody>,
) -> ApiResult<HttpResponse> {
    let ticket = state
        .support
        .reply(
            auth.caller(),
            TicketId::from_uuid(path.into_inner()),
            payload.into_inner().message,
        )
        .await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(ticket)))
}

/// Append an admin response; moves the ticket to in-progress (admin only).
#[utoipa::path(
    post,
    path = "/api/v1/support/tickets/{id}/respond",
    request_body = MessageBody,
    params(("id" = Uuid, Path, description = "Ticket identifier")),
    responses(
        (status = 201, description = "Response appended", body = TicketResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Admin access required", body = crate::domain::Error),
        (status = 404, description = "Ticket not found", body = crate::domain::Error)
    ),
    tags = ["support"],
    operation_id = "respondToTicket"
)]
#[post("/support/tickets/{id}/respond")]
pub async fn respond_to_ticket(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<MessageBody>,
) -> ApiResult<HttpResponse> {
    let ticket = state
        .support
        .respond(
            auth.caller(),
            TicketId::from_uuid(path.into_inner()),
            payload.into_inner().message,
        )
        .await?;
    Ok(HttpResponse::Created().json(TicketResponse::from(ticket)))
}

/// Set a ticket's status (admin only).
#[utoipa::path(
    patch,
    path = "/api/v1/support/tickets/{id}/status",
    request_body = TicketStatusBody,
    params(("id" = Uuid, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Updated ticket", body = TicketResponse),
        (status = 400, description = "Invalid status", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Admin access required", body = crate::domain::Error),
        (status = 404, description = "Ticket not found", body = crate::domain::Error)
    ),
    tags = ["support"],
    operation_id = "setTicketStatus"
)]
#[patch("/support/tickets/{id}/status")]
pub async fn set_ticket_status(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<TicketStatusBody>,
) -> ApiResult<web::Json<TicketResponse>> {
    let status = parse_ticket_status(&payload.status)?;
    let ticket = state
        .support
        .set_status(auth.caller(), TicketId::from_uuid(path.into_inner()), status)
        .await?;
    Ok(web::Json(ticket.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use actix_web::App;
    use chrono::Utc;
    use rstest::rstest;

    use crate::domain::ports::{
        MockAccountService, MockLunchService, MockNotificationService, MockPaymentService,
        MockStudentService, MockSupportService,
    };
    use crate::domain::{Caller, Role, SupportTicket, UserId};
    use crate::inbound::http::auth::TokenCodec;

    fn state_with_uploads(support: MockSupportService, upload_dir: std::path::PathBuf) -> HttpState {
        HttpState {
            accounts: Arc::new(MockAccountService::new()),
            students: Arc::new(MockStudentService::new()),
            payments: Arc::new(MockPaymentService::new()),
            lunch: Arc::new(MockLunchService::new()),
            support: Arc::new(support),
            notifications: Arc::new(MockNotificationService::new()),
            public_base_url: "https://lunch.example/".parse().expect("valid url"),
            upload_dir,
        }
    }

    fn state_with_support(support: MockSupportService) -> HttpState {
        state_with_uploads(support, std::env::temp_dir())
    }

    fn parent() -> Caller {
        Caller {
            id: UserId::random(),
            name: "Ada Obi".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: None,
            role: Role::Parent,
        }
    }

    fn open_ticket(parent_id: UserId) -> TicketWithReplies {
        let now = Utc::now();
        TicketWithReplies {
            ticket: SupportTicket {
                id: TicketId::random(),
                parent_id,
                subject: "Wrong balance".to_owned(),
                message: "The wallet shows an old balance.".to_owned(),
                priority: TicketPriority::Medium,
                status: TicketStatus::Open,
                attachment_path: None,
                admin_response: None,
                admin_response_at: None,
                created_at: now,
                updated_at: now,
            },
            replies: Vec::new(),
        }
    }

    #[rstest]
    #[case("receipt.PDF", ".pdf")]
    #[case("no-extension", "")]
    #[case("weird.name.tar.gz", ".gz")]
    #[case("bad.ex+t", "")]
    fn attachment_filenames_keep_only_safe_extensions(
        #[case] original: &str,
        #[case] expected_suffix: &str,
    ) {
        let filename = attachment_filename(original);
        if expected_suffix.is_empty() {
            assert!(
                !filename.contains('.'),
                "unsafe extensions should be dropped: {filename}"
            );
        } else {
            assert!(
                filename.ends_with(expected_suffix),
                "expected {filename} to end with {expected_suffix}"
            );
        }
    }

    #[actix_web::test]
    async fn ticket_creation_stores_the_attachment_under_the_upload_dir() {
        let caller = parent();
        let uploads = tempfile::tempdir().expect("upload dir");
        let upload_dir = uploads.path().to_path_buf();

        let mut support = MockSupportService::new();
        let ticket = open_ticket(caller.id);
        support
            .expect_create()
            .withf(|_, request| {
                request.subject == "Wrong balance"
                    && request.priority == TicketPriority::High
                    && request
                        .attachment_path
                        .as_deref()
                        .is_some_and(|path| path.ends_with(".pdf"))
            })
            .returning(move |_, _| Ok(ticket.clone()));

        let codec = web::Data::new(TokenCodec::new("test-secret"));
        let token = codec.issue(&caller).expect("token issues");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_uploads(support, upload_dir.clone())))
                .app_data(codec)
                .service(create_ticket),
        )
        .await;

        let boundary = "ticket-form-test";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"subject\"\r\n\r\n\
             Wrong balance\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"message\"\r\n\r\n\
             The wallet shows an old balance.\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"priority\"\r\n\r\n\
             high\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"attachment\"; filename=\"receipt.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             not really a pdf\r\n\
             --{boundary}--\r\n"
        );

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/support/tickets")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .insert_header((
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                ))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let stored: Vec<_> = std::fs::read_dir(&upload_dir)
            .expect("upload dir readable")
            .collect();
        assert_eq!(stored.len(), 1, "exactly one attachment stored");
    }

    #[actix_web::test]
    async fn blank_subjects_are_rejected_as_missing() {
        let caller = parent();
        let uploads = tempfile::tempdir().expect("upload dir");

        let codec = web::Data::new(TokenCodec::new("test-secret"));
        let token = codec.issue(&caller).expect("token issues");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_uploads(
                    MockSupportService::new(),
                    uploads.path().to_path_buf(),
                )))
                .app_data(codec)
                .service(create_ticket),
        )
        .await;

        let boundary = "ticket-form-test";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"subject\"\r\n\r\n\
             \r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"message\"\r\n\r\n\
             The wallet shows an old balance.\r\n\
             --{boundary}--\r\n"
        );

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/support/tickets")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .insert_header((
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                ))
                .set_payload(body)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn status_update_parses_and_forwards() {
        let caller = parent();
        let mut support = MockSupportService::new();
        let ticket = open_ticket(caller.id);
        support
            .expect_set_status()
            .withf(|_, _, status| *status == TicketStatus::Resolved)
            .returning(move |_, _, _| Ok(ticket.clone()));

        let codec = web::Data::new(TokenCodec::new("test-secret"));
        let token = codec.issue(&caller).expect("token issues");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_support(support)))
                .app_data(codec)
                .service(set_ticket_status),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::patch()
                .uri(&format!("/support/tickets/{}/status", Uuid::new_v4()))
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .set_json(serde_json::json!({ "status": "resolved" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn replies_are_serialised_with_their_author() {
        let caller = parent();
        let mut thread = open_ticket(caller.id);
        thread.replies.push(TicketReply {
            id: crate::domain::ReplyId::random(),
            ticket_id: thread.ticket.id,
            author: crate::domain::ReplyAuthor::Admin,
            message: "We are on it.".to_owned(),
            created_at: Utc::now(),
        });
        let mut support = MockSupportService::new();
        let returned = thread.clone();
        support
            .expect_list()
            .returning(move |_| Ok(vec![returned.clone()]));

        let codec = web::Data::new(TokenCodec::new("test-secret"));
        let token = codec.issue(&caller).expect("token issues");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_support(support)))
                .app_data(codec)
                .service(list_tickets),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/support/tickets")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = actix_test::read_body_json(response).await;
        assert_eq!(body[0]["replies"][0]["author"], "admin");
    }
}
