use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use timetable_board_core::{
    errors::BoardError,
    models::{TelemetryDomain, TelemetryReport},
};
use tracing::debug;

use crate::{ApiState, middleware::error_handling::AppError};

/// Passes one solver telemetry payload through, flagging whether the
/// solver produced it for this snapshot.
#[axum::debug_handler]
pub async fn telemetry(
    State(state): State<Arc<ApiState>>,
    Path(domain): Path<String>,
) -> Result<Json<TelemetryReport>, AppError> {
    let domain = TelemetryDomain::from_slug(&domain)
        .ok_or_else(|| BoardError::NotFound(format!("Telemetry domain {}", domain)))?;

    let envelope = state.source.telemetry(domain).await?;
    let report = TelemetryReport::new(domain, envelope);
    debug!("Served {} telemetry (generated: {})", domain.slug(), report.generated);

    Ok(Json(report))
}
