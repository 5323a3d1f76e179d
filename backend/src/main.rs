//! Backend entry-point: wires configuration, persistence and REST endpoints.

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::server::{ServerConfig, create_server, drain_on};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    drain_on(
        async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(error = %error, "shutdown signal unavailable");
                std::future::pending::<()>().await;
            }
        },
        health_state,
        server.handle(),
    );
    server.await
}
