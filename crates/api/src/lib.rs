//! # Timetable Board API
//!
//! The API crate serves the timetable board: read-only views over the
//! latest solver run, built from the solver service's telemetry.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Turn the loaded view-model into JSON views
//! - **Middleware**: Error mapping shared by handlers and layers
//! - **Config**: Handle environment and application configuration
//!
//! The view-model lives in a [`ViewStore`]. It is loaded once at startup
//! and replaced on every `POST /api/view/refresh`.

/// Configuration module for API settings
pub mod config;
/// Request handlers that build the views
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, header},
};
use eyre::Result;
use timetable_board_client::{TelemetrySource, ViewStore};
use timetable_board_core::semester::SemesterGate;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use timetable_board_api::ApiState;
/// use timetable_board_client::{FileSource, ViewStore};
/// use timetable_board_core::semester::SemesterGate;
///
/// let state = Arc::new(ApiState {
///     store: ViewStore::new(),
///     source: Arc::new(FileSource::new("data")),
///     gate: SemesterGate::default(),
/// });
/// let app = timetable_board_api::build_router(state);
/// ```
pub struct ApiState {
    /// The current view-model
    pub store: ViewStore,
    /// Where view-models and telemetry are loaded from
    pub source: Arc<dyn TelemetrySource>,
    /// Semesters hidden from the timetable grid
    pub gate: SemesterGate,
}

/// Builds the application router with all routes and shared state
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Dashboard views
        .merge(routes::view::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration
///
/// This function sets up logging, loads the first view-model, configures
/// routes and starts the HTTP server. A failed first load is logged and
/// reported by the views; the server still starts so it can be refreshed.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = timetable_board_api::config::ApiConfig::from_env()?;
/// timetable_board_api::start_server(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        store: ViewStore::new(),
        source: config.build_source()?,
        gate: config.semester_gate(),
    });

    // Initial load
    match state.store.refresh(state.source.as_ref()).await {
        Ok(_) => info!("Initial view loaded"),
        Err(e) => warn!("Initial view load failed: {}", e),
    }

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(allowed);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout and tracing middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(
                middleware::error_handling::handle_layer_error,
            ))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
