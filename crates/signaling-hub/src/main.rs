//! Signaling Hub
//!
//! Stateful WebSocket signaling server for real-time pair-programming calls.
//!
//! # Servers
//!
//! One HTTP listener (default: 0.0.0.0:1926) carries the REST surface and
//! the WebSocket upgrade endpoint. TLS terminates at the deployment ingress.
//!
//! # State management
//!
//! - Presence lives in Redis pub/sub channel existence, nowhere else
//! - Call setup is stateless between requests; context exists only inside
//!   the accept handshake
//! - User and team records are read from Postgres and never written

#![warn(clippy::pedantic)]

use common::secret::ExposeSecret;
use signaling_hub::config::Config;
use signaling_hub::redis::SignalBus;
use signaling_hub::routes::{build_routes, AppState};
use signaling_hub::services::tokens::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signaling_hub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Signaling Hub");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        deploy_domain = %config.deploy_domain,
        debug = config.debug,
        "Configuration loaded successfully"
    );

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url.expose_secret())
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;
    info!("Connected to database");

    let bus = SignalBus::connect(config.redis_url.expose_secret())
        .await
        .map_err(|e| {
            error!("Failed to connect to Redis: {}", e);
            e
        })?;
    info!("Connected to Redis");

    let tokens = TokenIssuer::from_config(&config);

    let state = Arc::new(AppState {
        pool,
        config: config.clone(),
        bus,
        tokens,
    });
    let app = build_routes(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(bind_address = %config.bind_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
