//! # Keystone API Server
//!
//! Actix-web front for the listing gate: rate-limited, cached proxies to the
//! property data provider.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    let policies = config.gate.policies().map_err(|e| {
        tracing::error!("Invalid gate configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    tracing::info!(
        "Starting Keystone API Server on {}:{}",
        config.host,
        config.port
    );

    // One gate per process, shared by every worker
    let state = AppState::new(&config, policies);

    #[cfg(feature = "scheduler")]
    let mut sweeper =
        background::Sweeper::start(&background::SweepConfig::from_env(), state.clone())
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    {
        if let Some(sweeper) = sweeper.as_mut()
            && let Err(e) = sweeper.shutdown().await
        {
            tracing::warn!("Failed to stop expiry sweep: {}", e);
        }
    }

    Ok(())
}
