//! # Error Handling Middleware
//!
//! Maps board errors to HTTP status codes and JSON error bodies, so every
//! endpoint fails the same way.

use axum::{
    BoxError, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use timetable_board_core::errors::BoardError;
use tracing::warn;

/// Application error wrapper that provides HTTP status code mapping
///
/// Upstream failures surface as `502 Bad Gateway` with the upstream message
/// unchanged, so a dashboard can show it verbatim.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use timetable_board_api::middleware::error_handling::AppError;
/// use timetable_board_core::errors::BoardError;
///
/// async fn handler(room_number: String) -> Result<Json<String>, AppError> {
///     Err(AppError(BoardError::NotFound(format!("Room {}", room_number))))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BoardError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BoardError::NotFound(_) => StatusCode::NOT_FOUND,
            BoardError::Validation(_) => StatusCode::BAD_REQUEST,
            BoardError::Upstream { .. } | BoardError::Transport(_) | BoardError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            BoardError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BoardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Automatic conversion from BoardError to AppError
impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BoardError::Internal(err))
    }
}

/// Turns failures of the outer tower layers (the request timeout) into
/// responses with the same JSON body as handler errors.
pub async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("Request timed out");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
            .into_response();
    }
    AppError(BoardError::Internal(eyre::eyre!("Unhandled layer error: {}", err))).into_response()
}
