use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;
use timetable_board_client::ViewState;

use crate::ApiState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    /// `ready`, `empty` or `failed`.
    view: &'static str,
    error: Option<String>,
}

#[derive(Serialize)]
struct VersionResponse {
    version: String,
}

/// The server is healthy as long as it answers; the view state says
/// whether there is anything to show.
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let (view, error) = match state.store.state() {
        ViewState::Ready(_) => ("ready", None),
        ViewState::Empty => ("empty", None),
        ViewState::Failed(message) => ("failed", Some(message)),
    };
    Json(HealthResponse {
        status: "ok",
        view,
        error,
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
