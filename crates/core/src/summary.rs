//! Headline counts and status lines for the overview page.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::session::{Day, ScheduleType, Session};
use crate::models::telemetry::{LabelValue, Metrics, SolverMetrics, WarmStart};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_sessions: usize,
    pub lab_sessions: usize,
    pub theory_sessions: usize,
    /// Distinct teachers, by id when present, else by name.
    pub teachers: usize,
    /// Distinct rooms, by id when present, else by number.
    pub rooms: usize,
}

impl ScheduleSummary {
    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Self {
        let mut summary = ScheduleSummary::default();
        let mut teachers = HashSet::new();
        let mut rooms = HashSet::new();

        for session in sessions {
            summary.total_sessions += 1;
            match session.schedule_type {
                ScheduleType::Lab => summary.lab_sessions += 1,
                ScheduleType::Theory => summary.theory_sessions += 1,
            }
            teachers.insert(first_non_empty(&session.teacher_id, &session.teacher_name));
            rooms.insert(first_non_empty(&session.room_id, &session.room_number));
        }

        summary.teachers = teachers.len();
        summary.rooms = rooms.len();
        summary
    }
}

fn first_non_empty<'a>(preferred: &'a str, fallback: &'a str) -> &'a str {
    if preferred.is_empty() {
        fallback
    } else {
        preferred
    }
}

/// Busiest day and peak slot, formatted as `"Monday (42)"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub busiest_day: Option<String>,
    pub peak_slot: Option<String>,
}

impl Highlights {
    pub fn from_metrics(metrics: &Metrics) -> Self {
        Self {
            busiest_day: metrics.highlights.busiest_day.as_ref().and_then(highlight),
            peak_slot: metrics.highlights.peak_slot.as_ref().and_then(highlight),
        }
    }
}

fn highlight(point: &LabelValue) -> Option<String> {
    if point.label.is_empty() {
        return None;
    }
    Some(format!("{} ({})", display_label(&point.label), point.value))
}

/// Display form of a chart label: day keys become day names.
pub fn display_label(label: &str) -> String {
    match Day::from_key(&label.to_lowercase()) {
        Some(day) => day.label().to_string(),
        None => label.to_string(),
    }
}

/// One-line solver status, e.g. `"Solver: OPTIMAL · obj 118 · 4.27s"`.
/// `None` when the solver reported nothing.
pub fn solver_status_line(metrics: &SolverMetrics) -> Option<String> {
    let solver = metrics.solver.as_ref()?;
    let mut bits = Vec::new();
    if let Some(status) = &solver.status {
        bits.push(format!("Solver: {}", status));
    }
    if let Some(objective) = solver.objective_value {
        bits.push(format!("obj {}", objective));
    }
    if let Some(wall_time) = solver.wall_time {
        bits.push(format!("{:.2}s", wall_time));
    }
    (!bits.is_empty()).then(|| bits.join(" · "))
}

/// Warm-start counts, or `None` when no warm start was available.
pub fn warm_start_line(warm_start: &WarmStart) -> Option<String> {
    warm_start.available.then(|| {
        format!(
            "Warm-start: lab {} · theory {}",
            warm_start.counts.lab, warm_start.counts.theory
        )
    })
}
