//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! REST API: every HTTP endpoint, the wire DTO schemas, and the bearer-token
//! security scheme. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::{accounts, lunch, notifications, payments, students, support};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "School lunch wallet API",
        description = "HTTP interface for lunch wallet funding, serving and support."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        accounts::register,
        accounts::login,
        accounts::current_account,
        students::list_students,
        students::create_student,
        students::update_student,
        students::delete_student,
        payments::initiate_payment,
        payments::list_payments,
        payments::verify_payment,
        payments::record_manual_payment,
        payments::override_payment_status,
        lunch::eligibility_report,
        lunch::serve_lunch,
        lunch::list_menu,
        lunch::create_menu_item,
        lunch::list_orders,
        lunch::place_order,
        lunch::get_preferences,
        lunch::update_preferences,
        support::list_tickets,
        support::create_ticket,
        support::reply_to_ticket,
        support::respond_to_ticket,
        support::set_ticket_status,
        notifications::list_notifications,
        notifications::apply_notification_action,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        accounts::RegisterRequest,
        accounts::LoginBody,
        accounts::CallerResponse,
        accounts::AuthResponse,
        students::StudentRequest,
        students::StudentPatchRequest,
        students::StudentResponse,
        payments::PaymentRequest,
        payments::StatusOverrideRequest,
        payments::PaymentResponse,
        payments::InitiatedPaymentResponse,
        lunch::EligibilityResponse,
        lunch::ServeRequest,
        lunch::MenuItemRequest,
        lunch::MenuItemResponse,
        lunch::OrderRequest,
        lunch::LunchOrderResponse,
        lunch::PreferencesRequest,
        lunch::PreferencesResponse,
        support::TicketForm,
        support::MessageBody,
        support::TicketStatusBody,
        support::ReplyResponse,
        support::TicketResponse,
        notifications::NotificationResponse,
        notifications::InboxPageResponse,
        notifications::NotificationActionRequest,
        notifications::ReadAllResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and the current account"),
        (name = "students", description = "Student roster management"),
        (name = "payments", description = "Wallet funding and payment lifecycle"),
        (name = "lunch", description = "Serving line, menu, orders and preferences"),
        (name = "support", description = "Support tickets and replies"),
        (name = "notifications", description = "Stored notification inbox"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
