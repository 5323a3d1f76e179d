//! Server construction, dependency wiring and middleware.

mod config;

pub use config::ServerConfig;

use std::future::Future;
use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::EventNotifier;
use crate::domain::services::{
    AccountServiceImpl, LunchServiceImpl, NotificationServiceImpl, PaymentServiceImpl,
    StudentServiceImpl, SupportServiceImpl,
};
use crate::inbound::http::accounts::{current_account, login, register};
use crate::inbound::http::auth::TokenCodec;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::lunch::{
    create_menu_item, eligibility_report, get_preferences, list_menu, list_orders, place_order,
    serve_lunch, update_preferences,
};
use crate::inbound::http::notifications::{apply_notification_action, list_notifications};
use crate::inbound::http::payments::{
    initiate_payment, list_payments, override_payment_status, record_manual_payment,
    verify_payment,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::students::{
    create_student, delete_student, list_students, update_student,
};
use crate::inbound::http::support::{
    create_ticket, list_tickets, reply_to_ticket, respond_to_ticket, set_ticket_status,
};
use crate::middleware::trace::Trace;
use crate::outbound::gateway::FlutterwaveHttpGateway;
use crate::outbound::persistence::{
    DbPool, DieselLunchOrderRepository, DieselLunchPreferencesRepository, DieselMenuRepository,
    DieselNotificationRepository, DieselPaymentRepository, DieselStudentRepository,
    DieselSupportTicketRepository, DieselUserRepository, PoolConfig,
};

/// Dependency bundle threaded into every worker's app instance.
#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    codec: web::Data<TokenCodec>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        codec,
    } = deps;

    let api = web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(current_account)
        .service(list_students)
        .service(create_student)
        .service(update_student)
        .service(delete_student)
        .service(initiate_payment)
        .service(verify_payment)
        .service(list_payments)
        .service(record_manual_payment)
        .service(override_payment_status)
        .service(eligibility_report)
        .service(serve_lunch)
        .service(list_menu)
        .service(create_menu_item)
        .service(list_orders)
        .service(place_order)
        .service(get_preferences)
        .service(update_preferences)
        .service(list_tickets)
        .service(create_ticket)
        .service(reply_to_ticket)
        .service(respond_to_ticket)
        .service(set_ticket_status)
        .service(list_notifications)
        .service(apply_notification_action);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(codec)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Wire repositories and services into the shared handler state.
fn build_http_state(
    config: &ServerConfig,
    pool: DbPool,
    gateway: FlutterwaveHttpGateway,
    verify_redirect_url: String,
) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let students = Arc::new(DieselStudentRepository::new(pool.clone()));

    // The inbox doubles as the event notifier so every domain event lands as
    // a stored notification.
    let inbox = Arc::new(NotificationServiceImpl::new(
        Arc::new(DieselNotificationRepository::new(pool.clone())),
        users.clone(),
    ));
    let notifier: Arc<dyn EventNotifier> = inbox.clone();

    let accounts = Arc::new(AccountServiceImpl::new(
        users,
        config.admin_registration_code.clone(),
    ));
    let student_service = Arc::new(StudentServiceImpl::new(students.clone(), notifier.clone()));
    let payments = Arc::new(PaymentServiceImpl::new(
        Arc::new(DieselPaymentRepository::new(pool.clone())),
        students.clone(),
        Arc::new(gateway),
        notifier.clone(),
        verify_redirect_url,
    ));
    let lunch = Arc::new(LunchServiceImpl::new(
        students,
        Arc::new(DieselMenuRepository::new(pool.clone())),
        Arc::new(DieselLunchOrderRepository::new(pool.clone())),
        Arc::new(DieselLunchPreferencesRepository::new(pool.clone())),
        notifier.clone(),
        config.daily_rate,
    ));
    let support = Arc::new(SupportServiceImpl::new(
        Arc::new(DieselSupportTicketRepository::new(pool)),
        notifier,
    ));

    HttpState {
        accounts,
        students: student_service,
        payments,
        lunch,
        support,
        notifications: inbox,
        public_base_url: config.public_base_url.clone(),
        upload_dir: config.upload_dir.clone(),
    }
}

/// Construct the Actix HTTP server with database-backed services.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the pool, the gateway client, the
/// upload directory or the listener cannot be set up.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let pool = DbPool::new(PoolConfig::new(config.database_url.clone()))
        .await
        .map_err(|error| std::io::Error::other(format!("database pool: {error}")))?;
    let gateway = FlutterwaveHttpGateway::new(
        config.gateway_base_url.clone(),
        config.gateway_secret.clone(),
    )
    .map_err(|error| std::io::Error::other(format!("gateway client: {error}")))?;
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let verify_redirect_url = config.verify_redirect_url()?;
    let http_state = web::Data::new(build_http_state(
        &config,
        pool,
        gateway,
        verify_redirect_url,
    ));
    let codec = web::Data::new(TokenCodec::new(&config.auth_token_secret));

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            codec: codec.clone(),
        })
    })
    .bind(config.bind_addr)?
    .disable_signals()
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Flip liveness and begin a graceful stop once `shutdown` resolves, so the
/// load balancer sees the drain before the listener closes.
pub fn drain_on<F>(shutdown: F, health_state: web::Data<HealthState>, handle: ServerHandle)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        shutdown.await;
        health_state.mark_unhealthy();
        handle.stop(true).await;
    });
}
