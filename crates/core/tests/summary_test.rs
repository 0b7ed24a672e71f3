use pretty_assertions::assert_eq;
use serde_json::json;
use timetable_board_core::models::{
    Envelope, Metrics, RawEntry, Session, SolverMetrics, TelemetryDomain, TelemetryReport,
    WarmStart,
};
use timetable_board_core::normalize::normalize;
use timetable_board_core::summary::{
    Highlights, ScheduleSummary, display_label, solver_status_line, warm_start_line,
};

fn session(value: serde_json::Value) -> Session {
    let entry: RawEntry = serde_json::from_value(value).expect("Failed to deserialize entry");
    normalize(&entry, None)
}

#[test]
fn test_schedule_summary_counts_distinct_people_and_rooms() {
    let sessions = vec![
        session(json!({ "schedule_type": "lab", "teacher_id": "T1", "teacher_name": "A", "room_id": "R1" })),
        session(json!({ "schedule_type": "lab", "teacher_id": "T1", "teacher_name": "A (alias)", "room_number": "101" })),
        session(json!({ "schedule_type": "theory", "teacher_name": "B", "room_number": "101" })),
        session(json!({ "schedule_type": "theory" })),
    ];

    let summary = ScheduleSummary::from_sessions(&sessions);

    assert_eq!(
        summary,
        ScheduleSummary {
            total_sessions: 4,
            lab_sessions: 2,
            theory_sessions: 2,
            teachers: 3,
            rooms: 3,
        }
    );
}

#[test]
fn test_highlights_use_day_names() {
    let metrics: Metrics = serde_json::from_value(json!({
        "totals": { "sessions": 10 },
        "highlights": {
            "busiest_day": { "label": "thur", "value": 42 },
            "peak_slot": { "label": "9:00 - 9:50", "value": 7 },
        },
    }))
    .unwrap();

    let highlights = Highlights::from_metrics(&metrics);

    assert_eq!(metrics.totals.sessions, 10);
    assert_eq!(highlights.busiest_day.as_deref(), Some("Thursday (42)"));
    assert_eq!(highlights.peak_slot.as_deref(), Some("9:00 - 9:50 (7)"));
    assert_eq!(Highlights::from_metrics(&Metrics::default()), Highlights::default());
    assert_eq!(display_label("FRI"), "Friday");
}

#[test]
fn test_status_lines() {
    let solver: SolverMetrics = serde_json::from_value(json!({
        "solver": { "status": "OPTIMAL", "objective_value": 118, "wall_time": 4.267 },
    }))
    .unwrap();
    let warm: WarmStart = serde_json::from_value(json!({
        "available": true,
        "counts": { "lab": 12, "theory": 30 },
    }))
    .unwrap();

    assert_eq!(
        solver_status_line(&solver).as_deref(),
        Some("Solver: OPTIMAL · obj 118 · 4.27s")
    );
    assert_eq!(solver_status_line(&SolverMetrics::default()), None);
    assert_eq!(warm_start_line(&warm).as_deref(), Some("Warm-start: lab 12 · theory 30"));
    assert_eq!(warm_start_line(&WarmStart::default()), None);
}

#[test]
fn test_telemetry_report_tracks_generation() {
    let generated: Envelope<serde_json::Value> = serde_json::from_value(json!({
        "data": { "generated_at": "2024-11-02T09:15:00", "summary": {} },
        "snapshot": { "folder": "run_42", "generated_at": "2024-11-02T09:15:00" },
    }))
    .unwrap();
    let missing: Envelope<serde_json::Value> =
        serde_json::from_value(json!({ "data": { "generated_at": null } })).unwrap();

    let report = TelemetryReport::new(TelemetryDomain::Grouping, generated);
    assert!(report.generated);
    let snapshot = report.snapshot.expect("snapshot should be kept");
    assert_eq!(snapshot.folder.as_deref(), Some("run_42"));
    assert!(snapshot.generated_at_utc().is_some());

    assert!(!TelemetryReport::new(TelemetryDomain::Validation, missing).generated);
}

#[test]
fn test_domain_slugs_round_trip() {
    for domain in TelemetryDomain::ALL {
        assert_eq!(TelemetryDomain::from_slug(domain.slug()), Some(domain));
    }
    assert_eq!(TelemetryDomain::SlotCaps.path(), "/api/slot-caps");
    assert_eq!(TelemetryDomain::from_slug("slot_caps"), None);
}
