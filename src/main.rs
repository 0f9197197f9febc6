mod auth;
mod catalog;
mod config;
mod game;
mod models;
mod routes;
mod websocket;

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use catalog::{CatalogSource, FileCatalog};
use config::Config;
use game::SharedSession;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    /// The one game session of this process
    pub session: SharedSession,
    pub catalog: Arc<dyn CatalogSource>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn CatalogSource>) -> Self {
        let session = SharedSession::new(config.session_settings());
        Self {
            config,
            session,
            catalog,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taboo_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Taboo backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Check the card catalog up front; it is re-read at every round start
    let file_catalog = FileCatalog::new(&config.game.catalog_path);
    match file_catalog.load().await {
        Ok(entries) => {
            tracing::info!(
                "Card catalog has {} playable cards",
                catalog::playable_count(&entries)
            );
        }
        Err(e) => {
            tracing::warn!("Failed to load card catalog: {:#}", e);
            tracing::warn!(
                "Rounds cannot start until {} contains valid cards",
                config.game.catalog_path
            );
        }
    }

    let state = Arc::new(AppState::new(config.clone(), Arc::new(file_catalog)));

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve frontend static files
    let frontend_service = ServeDir::new(&config.server.static_dir);

    // Build router
    let app = Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
