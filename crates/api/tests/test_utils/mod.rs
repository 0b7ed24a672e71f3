use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};
use timetable_board_api::{ApiState, build_router};
use timetable_board_client::mock::MockSource;
use timetable_board_client::{DashboardView, ViewStore};
use timetable_board_core::models::{Envelope, SchedulePayload};
use timetable_board_core::semester::SemesterGate;

pub fn schedule() -> Envelope<SchedulePayload> {
    serde_json::from_value(json!({
        "data": {
            "theory_entries": [
                {
                    "course_code": "CS301", "course_name": "Operating Systems",
                    "department": "Computer Science & Engineering", "semester": 5,
                    "group_name": "CSE_S5_G1", "teacher_name": "R. Iyer", "teacher_id": "T-1",
                    "room_number": "A-101", "block": "Main", "day": "monday",
                    "time_slot": "9:00 - 9:50",
                },
                {
                    "course_code": "MA201", "course_name": "Discrete Mathematics",
                    "department": "Mathematics", "semester": 3,
                    "group_name": "MA_S3_G1", "teacher_name": "P. Rao",
                    "room_number": "A-101", "block": "Main", "day": "tuesday",
                    "time_slot": "1:20 - 2:10",
                },
                {
                    "course_code": "HS101", "department": "Humanities", "semester": 3,
                    "group_name": "HS_S3_G1", "day": "wed", "time_slot": "8:00 - 8:50",
                },
            ],
            "lab_entries": [
                {
                    "course_code": "CS391", "course_name": "Systems Lab",
                    "department": "Computer Science & Engineering", "semester": 5,
                    "group_name": "CSE_S5_G1", "teacher_name": "M. Das",
                    "room_number": "L-12", "room_id": "LAB12", "block": "Annex", "day": "monday",
                    "time_range": "8:00 - 9:40",
                },
            ],
        },
        "snapshot": { "folder": "run_42", "generated_at": "2024-11-02T09:15:00" },
    }))
    .expect("Failed to build schedule fixture")
}

pub fn telemetry_data(slug: &str) -> Value {
    match slug {
        "metrics" => json!({
            "totals": { "sessions": 4 },
            "highlights": { "busiest_day": { "label": "monday", "value": 2 } },
        }),
        "solver-metrics" => json!({ "solver": { "status": "OPTIMAL", "objective_value": 12, "wall_time": 1.5 } }),
        "warm-start" => json!({ "available": true, "counts": { "lab": 1, "theory": 3 } }),
        "grouping" => json!({ "generated_at": "2024-11-02T09:15:00", "departments": [] }),
        _ => Value::Null,
    }
}

/// A source that serves the fixtures above.
pub fn healthy_source() -> MockSource {
    let mut source = MockSource::new();
    source.expect_schedule().returning(|| Ok(schedule()));
    source.expect_telemetry().returning(|domain| {
        Ok(Envelope {
            data: telemetry_data(domain.slug()),
            snapshot: None,
        })
    });
    source
}

pub struct TestContext {
    pub source: MockSource,
    pub gate: SemesterGate,
    pub preload: bool,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            source: healthy_source(),
            gate: SemesterGate::default(),
            preload: true,
        }
    }

    /// Builds state; with `preload` the fixture view is already in the store.
    pub fn build_state(self) -> Arc<ApiState> {
        let store = ViewStore::new();
        if self.preload {
            let token = store.begin();
            let view = DashboardView::build(
                schedule(),
                serde_json::from_value(telemetry_data("metrics")).ok(),
                serde_json::from_value(telemetry_data("solver-metrics")).ok(),
                serde_json::from_value(telemetry_data("warm-start")).ok(),
            );
            store.apply(token, Ok(view));
        }

        Arc::new(ApiState {
            store,
            source: Arc::new(self.source),
            gate: self.gate,
        })
    }

    pub fn server(self) -> TestServer {
        TestServer::new(build_router(self.build_state())).expect("Failed to start test server")
    }
}
