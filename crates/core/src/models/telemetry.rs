use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::{RawEntry, lenient_rows};

/// Standard wrapper around every solver telemetry payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub data: T,
    #[serde(default)]
    pub snapshot: Option<Snapshot>,
}

/// Identifies the solver run a payload was produced from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

impl Snapshot {
    /// Generation time as UTC.
    ///
    /// Accepts RFC 3339 as well as naive ISO timestamps, which are taken to
    /// be UTC already.
    pub fn generated_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.generated_at.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|stamp| stamp.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }
}

/// Raw lab and theory exports of one solver run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulePayload {
    #[serde(default, deserialize_with = "lenient_rows")]
    pub lab_entries: Vec<RawEntry>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub theory_entries: Vec<RawEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelValue {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricTotals {
    pub sessions: u64,
    pub theory: u64,
    pub labs: u64,
    pub departments: u64,
    pub teachers: u64,
    pub rooms_used: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricHighlights {
    pub busiest_day: Option<LabelValue>,
    pub peak_slot: Option<LabelValue>,
}

/// Aggregate counts the solver precomputes for the overview charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub totals: MetricTotals,
    pub day_distribution: Vec<LabelValue>,
    pub department_load: Vec<LabelValue>,
    pub slot_distribution: Vec<LabelValue>,
    pub highlights: MetricHighlights,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverStatus {
    pub status: Option<String>,
    pub wall_time: Option<f64>,
    pub objective_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverMetrics {
    pub solver: Option<SolverStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmStartCounts {
    pub lab: u64,
    pub theory: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmStart {
    pub available: bool,
    pub counts: WarmStartCounts,
}

/// Every telemetry payload the solver service publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TelemetryDomain {
    Schedule,
    Metrics,
    Rooms,
    SolverMetrics,
    WarmStart,
    Grouping,
    Overlaps,
    SlotCaps,
    TeacherLabs,
    Validation,
}

impl TelemetryDomain {
    pub const ALL: [TelemetryDomain; 10] = [
        TelemetryDomain::Schedule,
        TelemetryDomain::Metrics,
        TelemetryDomain::Rooms,
        TelemetryDomain::SolverMetrics,
        TelemetryDomain::WarmStart,
        TelemetryDomain::Grouping,
        TelemetryDomain::Overlaps,
        TelemetryDomain::SlotCaps,
        TelemetryDomain::TeacherLabs,
        TelemetryDomain::Validation,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            TelemetryDomain::Schedule => "schedule",
            TelemetryDomain::Metrics => "metrics",
            TelemetryDomain::Rooms => "rooms",
            TelemetryDomain::SolverMetrics => "solver-metrics",
            TelemetryDomain::WarmStart => "warm-start",
            TelemetryDomain::Grouping => "grouping",
            TelemetryDomain::Overlaps => "overlaps",
            TelemetryDomain::SlotCaps => "slot-caps",
            TelemetryDomain::TeacherLabs => "teacher-labs",
            TelemetryDomain::Validation => "validation",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        TelemetryDomain::ALL
            .into_iter()
            .find(|domain| domain.slug() == slug)
    }

    /// Path of the payload on the solver service.
    pub fn path(self) -> String {
        format!("/api/{}", self.slug())
    }

    /// Whether the dashboards bypass HTTP caches for this payload.
    pub fn is_volatile(self) -> bool {
        !matches!(
            self,
            TelemetryDomain::Schedule | TelemetryDomain::Metrics | TelemetryDomain::Rooms
        )
    }
}

/// A pass-through telemetry payload with its generation status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReport {
    pub domain: TelemetryDomain,
    pub snapshot: Option<Snapshot>,
    /// False when the solver ran without producing this telemetry.
    pub generated: bool,
    pub data: Value,
}

impl TelemetryReport {
    pub fn new(domain: TelemetryDomain, envelope: Envelope<Value>) -> Self {
        let generated = envelope
            .data
            .get("generated_at")
            .is_some_and(|stamp| !stamp.is_null());
        Self {
            domain,
            snapshot: envelope.snapshot,
            generated,
            data: envelope.data,
        }
    }
}
