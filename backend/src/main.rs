//! Commodity Receiving Platform - Backend Server
//!
//! Calculation service for receiving stations: quality discounts, drying
//! batch allocation and pricing of agricultural commodity receptions.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use error::AppError;
use services::BatchRegistry;
use shared::PriceList;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub prices: Arc<PriceList>,
    pub batches: BatchRegistry,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let prices = Arc::new(config.receiving.price_list());
        Self {
            config: Arc::new(config),
            prices,
            batches: BatchRegistry::new(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "receiving_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;
    config
        .receiving
        .validate()
        .map_err(|e| AppError::Configuration(e.to_string()))?;

    tracing::info!("Starting Commodity Receiving Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        thresholds = config.receiving.thresholds.len(),
        price_rates = config.receiving.prices.len(),
        "Receiving configuration loaded"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::new(config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Commodity Receiving Platform API v1.0"
}
