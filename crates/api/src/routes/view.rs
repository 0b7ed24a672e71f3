use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/view/summary", get(handlers::view::summary))
        .route("/api/view/sessions", get(handlers::view::sessions))
        .route("/api/view/filters", get(handlers::view::filters))
        .route("/api/view/rooms", get(handlers::view::rooms))
        .route(
            "/api/view/rooms/:room_number/grid",
            get(handlers::view::room_grid),
        )
        .route("/api/view/grid", get(handlers::view::grid))
        .route("/api/view/groups", get(handlers::view::groups))
        .route(
            "/api/view/telemetry/:domain",
            get(handlers::telemetry::telemetry),
        )
        .route("/api/view/refresh", post(handlers::view::refresh))
}
