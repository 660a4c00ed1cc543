//! Cinevote server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use cinevote_api::{AppState, Broadcaster, router as api_router, streaming_handler};
use cinevote_common::Config;
use cinevote_core::{CatalogService, VotingService};
use cinevote_db::repositories::{BallotRepository, WinnerRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinevote=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting cinevote server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = cinevote_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    cinevote_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let ballot_repo = BallotRepository::new(Arc::clone(&db));
    let winner_repo = WinnerRepository::new(Arc::clone(&db));

    // Initialize services
    let voting_service = VotingService::new(ballot_repo, winner_repo);
    let catalog_service = CatalogService::new(&config.catalog)?;

    // The broadcaster is owned here and handed to call sites through the
    // application state
    let broadcaster = Broadcaster::new();

    // Create app state
    let state = AppState {
        voting_service,
        catalog_service,
        broadcaster,
    };

    // Build router
    let app = Router::new()
        .route("/streaming", get(streaming_handler))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
