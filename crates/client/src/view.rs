use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use timetable_board_core::errors::BoardResult;
use timetable_board_core::models::{
    Envelope, Metrics, RoomIndex, SchedulePayload, Session, Snapshot, SolverMetrics, TelemetryDomain,
    WarmStart,
};
use timetable_board_core::normalize::normalize_payload;
use timetable_board_core::rooms::aggregate;
use timetable_board_core::summary::ScheduleSummary;

use crate::source::TelemetrySource;

/// Everything the dashboards render, built from one load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub snapshot: Option<Snapshot>,
    /// Sorted by day, start time and schedule type.
    pub sessions: Vec<Session>,
    pub rooms: RoomIndex,
    pub metrics: Option<Metrics>,
    pub solver: Option<SolverMetrics>,
    pub warm_start: Option<WarmStart>,
    pub summary: ScheduleSummary,
}

impl DashboardView {
    /// Builds the view from already fetched payloads.
    pub fn build(
        schedule: Envelope<SchedulePayload>,
        metrics: Option<Metrics>,
        solver: Option<SolverMetrics>,
        warm_start: Option<WarmStart>,
    ) -> Self {
        let sessions = normalize_payload(&schedule.data);
        let rooms = aggregate(&sessions);
        let summary = ScheduleSummary::from_sessions(&sessions);

        Self {
            snapshot: schedule.snapshot,
            sessions,
            rooms,
            metrics,
            solver,
            warm_start,
            summary,
        }
    }
}

/// Fetches the schedule and overview telemetry concurrently and builds a
/// fresh view.
///
/// Every fetch runs to completion. Any failure aborts the load, and errors
/// are reported in a fixed order: schedule, metrics, solver, warm start.
pub async fn load_view_model(source: &dyn TelemetrySource) -> BoardResult<DashboardView> {
    let (schedule, metrics, solver, warm_start) = tokio::join!(
        source.schedule(),
        optional::<Metrics>(source, TelemetryDomain::Metrics),
        optional::<SolverMetrics>(source, TelemetryDomain::SolverMetrics),
        optional::<WarmStart>(source, TelemetryDomain::WarmStart),
    );

    let view = DashboardView::build(schedule?, metrics?, solver?, warm_start?);
    info!(
        "Loaded {} sessions across {} rooms ({} unassigned)",
        view.sessions.len(),
        view.rooms.rooms.len(),
        view.rooms.unassigned.len()
    );
    Ok(view)
}

/// A payload with no data decodes to `None`.
async fn optional<T>(source: &dyn TelemetrySource, domain: TelemetryDomain) -> BoardResult<Option<T>>
where
    T: DeserializeOwned,
{
    let envelope = source.telemetry(domain).await?;
    if envelope.data.is_null() {
        debug!("No {} telemetry in this snapshot", domain.slug());
        return Ok(None);
    }
    Ok(Some(serde_json::from_value::<T>(envelope.data)?))
}
