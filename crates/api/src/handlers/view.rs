use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timetable_board_client::{ApplyOutcome, DashboardView};
use timetable_board_core::{
    errors::BoardError,
    filter::{FilterOptions, RoomFilter, SessionFilter},
    grid::{GridTable, SectionedGridTable, build_grid, days_in},
    groups::{GroupKey, SessionGroup, group_sessions},
    models::{Day, Metrics, Room, RoomSummary, Session, Snapshot},
    summary::{Highlights, ScheduleSummary, solver_status_line, warm_start_line},
};
use tracing::{debug, info};

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub snapshot: Option<Snapshot>,
    pub generated_at: Option<DateTime<Utc>>,
    pub schedule: ScheduleSummary,
    pub rooms: RoomSummary,
    pub highlights: Highlights,
    /// Solver and warm-start banner lines, when reported.
    pub status: Vec<String>,
    pub metrics: Option<Metrics>,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub count: usize,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Serialize)]
pub struct UnassignedDay {
    pub day: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Serialize)]
pub struct RoomsResponse {
    pub summary: RoomSummary,
    pub blocks: Vec<String>,
    pub count: usize,
    pub rooms: Vec<Room>,
    pub unassigned: Vec<UnassignedDay>,
}

#[derive(Debug, Serialize)]
pub struct RoomGridResponse {
    pub room_number: String,
    pub room_id: String,
    pub block: String,
    pub room_type: String,
    pub utilization: f64,
    pub grid: GridTable,
}

#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub session_count: usize,
    /// Disabled semesters that hid sessions from this grid.
    pub hidden_semesters: Vec<u32>,
    /// True when every matching session belongs to a disabled semester;
    /// `grid` is then absent.
    pub disabled: bool,
    pub grid: Option<SectionedGridTable>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupQuery {
    /// department, semester, room, teacher or day; department when absent.
    #[serde(default)]
    pub by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupsResponse {
    pub by: GroupKey,
    pub session_count: usize,
    pub groups: Vec<SessionGroup>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub applied: bool,
    pub sessions: usize,
    pub refreshed_at: DateTime<Utc>,
}

fn current_view(state: &ApiState) -> Result<Arc<DashboardView>, AppError> {
    Ok(state.store.current()?)
}

#[axum::debug_handler]
pub async fn summary(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<SummaryResponse>, AppError> {
    let view = current_view(&state)?;

    let status = [
        view.solver.as_ref().and_then(solver_status_line),
        view.warm_start.as_ref().and_then(warm_start_line),
    ]
    .into_iter()
    .flatten()
    .collect();

    Ok(Json(SummaryResponse {
        generated_at: view.snapshot.as_ref().and_then(Snapshot::generated_at_utc),
        snapshot: view.snapshot.clone(),
        schedule: view.summary.clone(),
        rooms: view.rooms.summary(),
        highlights: view
            .metrics
            .as_ref()
            .map(Highlights::from_metrics)
            .unwrap_or_default(),
        status,
        metrics: view.metrics.clone(),
    }))
}

#[axum::debug_handler]
pub async fn sessions(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<SessionFilter>,
) -> Result<Json<SessionsResponse>, AppError> {
    let view = current_view(&state)?;
    let sessions: Vec<Session> = filter.apply(&view.sessions).into_iter().cloned().collect();

    debug!("{} of {} sessions match {:?}", sessions.len(), view.sessions.len(), filter);
    Ok(Json(SessionsResponse {
        count: sessions.len(),
        sessions,
    }))
}

#[axum::debug_handler]
pub async fn filters(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<FilterOptions>, AppError> {
    let view = current_view(&state)?;
    Ok(Json(FilterOptions::from_sessions(&view.sessions)))
}

#[axum::debug_handler]
pub async fn rooms(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<RoomFilter>,
) -> Result<Json<RoomsResponse>, AppError> {
    let view = current_view(&state)?;
    let rooms: Vec<Room> = filter.apply(&view.rooms.rooms).into_iter().cloned().collect();
    let unassigned = view
        .rooms
        .unassigned_by_day()
        .into_iter()
        .map(|(day, sessions)| UnassignedDay {
            day: day.to_string(),
            sessions: sessions.into_iter().cloned().collect(),
        })
        .collect();

    Ok(Json(RoomsResponse {
        summary: view.rooms.summary(),
        blocks: view.rooms.blocks().into_iter().map(str::to_string).collect(),
        count: rooms.len(),
        rooms,
        unassigned,
    }))
}

/// A room's week: every day column is present even when the room is free.
#[axum::debug_handler]
pub async fn room_grid(
    State(state): State<Arc<ApiState>>,
    Path(room_number): Path<String>,
) -> Result<Json<RoomGridResponse>, AppError> {
    let view = current_view(&state)?;
    let room = view
        .rooms
        .find(&room_number)
        .ok_or_else(|| BoardError::NotFound(format!("Room {}", room_number)))?;

    let grid = build_grid(&room.sessions, &Day::ORDER);

    Ok(Json(RoomGridResponse {
        room_number: room.room_number.clone(),
        room_id: room.room_id.clone(),
        block: room.block.clone(),
        room_type: room.room_type.as_str().to_string(),
        utilization: room.utilization,
        grid: grid.to_table(),
    }))
}

/// The timetable of the filtered sessions, over the days they occur on.
#[axum::debug_handler]
pub async fn grid(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<SessionFilter>,
) -> Result<Json<GridResponse>, AppError> {
    let view = current_view(&state)?;
    let matching = filter.apply(&view.sessions);
    let outcome = state.gate.apply(matching.iter().copied());

    if outcome.fully_disabled() {
        info!(
            "Timetable hidden: semesters {:?} are disabled",
            outcome.hidden_semesters
        );
        return Ok(Json(GridResponse {
            session_count: 0,
            hidden_semesters: outcome.hidden_semesters,
            disabled: true,
            grid: None,
        }));
    }

    let days = days_in(outcome.visible.iter().copied());
    let grid = build_grid(outcome.visible.iter().copied(), &days);

    Ok(Json(GridResponse {
        session_count: grid.session_count(),
        disabled: false,
        grid: Some(grid.to_sectioned_table()),
        hidden_semesters: outcome.hidden_semesters,
    }))
}

/// The filtered sessions grouped for the timetable's grouped views.
#[axum::debug_handler]
pub async fn groups(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<GroupQuery>,
    Query(filter): Query<SessionFilter>,
) -> Result<Json<GroupsResponse>, AppError> {
    let by = match query.by.as_deref().map(str::trim).filter(|by| !by.is_empty()) {
        None => GroupKey::Department,
        Some(raw) => GroupKey::parse(raw)
            .ok_or_else(|| BoardError::Validation(format!("Unknown grouping: {}", raw)))?,
    };

    let view = current_view(&state)?;
    let matching = filter.apply(&view.sessions);
    let groups = group_sessions(matching.iter().copied(), by);
    debug!("{} sessions in {} {} groups", matching.len(), groups.len(), by.as_str());

    Ok(Json(GroupsResponse {
        by,
        session_count: matching.len(),
        groups,
    }))
}

#[axum::debug_handler]
pub async fn refresh(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<RefreshResponse>, AppError> {
    let outcome = state.store.refresh(state.source.as_ref()).await?;
    let sessions = state
        .store
        .state()
        .view()
        .map_or(0, |view| view.sessions.len());

    Ok(Json(RefreshResponse {
        applied: outcome == ApplyOutcome::Applied,
        sessions,
        refreshed_at: Utc::now(),
    }))
}
