// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the planning pipeline
// Usage: cargo run --features api --bin api_server

use agroforestry_planner::{create_router, AppState, PlannerConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "agroforestry_planner=info,tower_http=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    // PLANNER_CONFIG, PROVIDER_TIMEOUT_MS, PROVIDER_RETRIES
    let config = PlannerConfig::from_env()?;

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    tracing::info!("Configuration:");
    tracing::info!("  CATALOG: {}", config.catalog_path.as_ref().map_or("built-in".to_string(), |p| p.display().to_string()));
    tracing::info!("  PROVIDER_TIMEOUT_MS: {}", config.provider.timeout_ms);
    tracing::info!("  PROVIDER_RETRIES: {}", config.provider.max_attempts);
    tracing::info!("  PORT: {}", port);

    let state = AppState::new(config).await?;
    tracing::info!("Application state initialized successfully");

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
