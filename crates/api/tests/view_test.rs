mod test_utils;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use timetable_board_core::semester::SemesterGate;

use test_utils::TestContext;

fn codes(sessions: &Value) -> Vec<String> {
    sessions
        .as_array()
        .expect("sessions should be an array")
        .iter()
        .map(|s| s["course_code"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_summary() {
    let server = TestContext::new().server();

    let response = server.get("/api/view/summary").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["snapshot"]["folder"], "run_42");
    assert_eq!(body["generated_at"], "2024-11-02T09:15:00Z");
    assert_eq!(
        body["schedule"],
        json!({ "total_sessions": 4, "lab_sessions": 1, "theory_sessions": 3, "teachers": 4, "rooms": 3 })
    );
    assert_eq!(body["rooms"]["total_rooms"], 2);
    assert_eq!(body["rooms"]["unassigned_sessions"], 1);
    assert_eq!(body["highlights"]["busiest_day"], "Monday (2)");
    assert_eq!(
        body["status"],
        json!(["Solver: OPTIMAL · obj 12 · 1.50s", "Warm-start: lab 1 · theory 3"])
    );
}

#[tokio::test]
async fn test_sessions_are_sorted() {
    let server = TestContext::new().server();

    let body: Value = server.get("/api/view/sessions").await.json();

    assert_eq!(body["count"], 4);
    assert_eq!(codes(&body["sessions"]), vec!["CS391", "CS301", "MA201", "HS101"]);
}

#[rstest]
#[case("department", "Mathematics", vec!["MA201"])]
#[case("day", "monday", vec!["CS391", "CS301"])]
#[case("schedule_type", "lab", vec!["CS391"])]
#[case("semester", "3", vec!["MA201", "HS101"])]
#[case("search", "iyer", vec!["CS301"])]
#[case("room_search", "l-1", vec!["CS391"])]
#[tokio::test]
async fn test_session_filters(
    #[case] key: &str,
    #[case] value: &str,
    #[case] expected: Vec<&str>,
) {
    let server = TestContext::new().server();

    let body: Value = server
        .get("/api/view/sessions")
        .add_query_param(key, value)
        .await
        .json();

    assert_eq!(codes(&body["sessions"]), expected);
}

#[tokio::test]
async fn test_filter_options() {
    let server = TestContext::new().server();

    let body: Value = server.get("/api/view/filters").await.json();

    assert_eq!(
        body["departments"],
        json!(["Computer Science & Engineering", "Humanities", "Mathematics"])
    );
    assert_eq!(body["semesters"], json!(["3", "5"]));
}

#[tokio::test]
async fn test_rooms() {
    let server = TestContext::new().server();

    let all: Value = server.get("/api/view/rooms").await.json();
    let main: Value = server
        .get("/api/view/rooms")
        .add_query_param("block", "Main")
        .await
        .json();

    assert_eq!(all["count"], 2);
    assert_eq!(all["rooms"][0]["room_number"], "L-12");
    assert_eq!(all["rooms"][0]["room_type"], "lab");
    assert_eq!(all["rooms"][1]["room_number"], "A-101");
    assert_eq!(all["blocks"], json!(["Annex", "Main"]));
    assert_eq!(all["unassigned"][0]["day"], "Wednesday");
    assert_eq!(codes(&all["unassigned"][0]["sessions"]), vec!["HS101"]);
    assert_eq!(main["count"], 1);
    assert_eq!(main["rooms"][0]["room_number"], "A-101");
}

#[tokio::test]
async fn test_room_grid_spans_the_week() {
    let server = TestContext::new().server();

    let response = server.get("/api/view/rooms/A-101/grid").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["room_type"], "theory");
    assert_eq!(body["utilization"], 10.0);
    let grid = &body["grid"];
    assert_eq!(grid["columns"].as_array().map(Vec::len), Some(6));
    assert_eq!(grid["columns"][0]["label"], "Monday");
    assert_eq!(grid["rows"][0]["slot"], "9:00 - 9:50");
    assert_eq!(grid["rows"][1]["slot"], "1:20 - 2:10");
    assert_eq!(codes(&grid["rows"][1]["cells"][1]), vec!["MA201"]);
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let server = TestContext::new().server();

    let response = server.get("/api/view/rooms/Z-1/grid").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "error": "Resource not found: Room Z-1" }));
}

#[tokio::test]
async fn test_grid_uses_present_days_and_sections() {
    let server = TestContext::new().server();

    let body: Value = server
        .get("/api/view/grid")
        .add_query_param("department", "Computer Science & Engineering")
        .await
        .json();

    assert_eq!(body["disabled"], false);
    assert_eq!(body["session_count"], 2);
    let grid = &body["grid"];
    assert_eq!(grid["columns"], json!([{ "column": { "day": "monday" }, "label": "Monday" }]));
    assert_eq!(grid["theory"][0]["slot"], "9:00 - 9:50");
    assert_eq!(grid["lab"][0]["slot"], "8:00 - 9:40");
}

#[tokio::test]
async fn test_grid_reports_disabled_semesters() {
    let mut ctx = TestContext::new();
    ctx.gate = SemesterGate::new([5]);
    let server = ctx.server();

    let hidden: Value = server
        .get("/api/view/grid")
        .add_query_param("semester", "5")
        .await
        .json();
    let partial: Value = server.get("/api/view/grid").await.json();

    assert_eq!(hidden["disabled"], true);
    assert_eq!(hidden["hidden_semesters"], json!([5]));
    assert_eq!(hidden["grid"], Value::Null);
    assert_eq!(partial["disabled"], false);
    assert_eq!(partial["hidden_semesters"], json!([5]));
    assert_eq!(partial["session_count"], 2);
}

fn labels(groups: &Value) -> Vec<String> {
    groups
        .as_array()
        .expect("groups should be an array")
        .iter()
        .map(|g| g["label"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_groups_default_to_department_then_semester() {
    let server = TestContext::new().server();

    let body: Value = server.get("/api/view/groups").await.json();

    assert_eq!(body["by"], "department");
    assert_eq!(body["session_count"], 4);
    assert_eq!(
        labels(&body["groups"]),
        vec!["Computer Science & Engineering", "Humanities", "Mathematics"]
    );
    let cse = &body["groups"][0];
    assert_eq!(cse["lab_sessions"], 1);
    assert_eq!(cse["theory_sessions"], 1);
    assert_eq!(labels(&cse["subgroups"]), vec!["5"]);
    assert_eq!(codes(&cse["subgroups"][0]["sessions"]), vec!["CS391", "CS301"]);
}

#[tokio::test]
async fn test_groups_by_teacher_and_filtered_day() {
    let server = TestContext::new().server();

    let teachers: Value = server
        .get("/api/view/groups")
        .add_query_param("by", "teacher")
        .await
        .json();
    let days: Value = server
        .get("/api/view/groups")
        .add_query_param("by", "day")
        .add_query_param("schedule_type", "theory")
        .await
        .json();

    assert_eq!(labels(&teachers["groups"]), vec!["M. Das", "P. Rao", "R. Iyer", "TBA"]);
    assert_eq!(teachers["groups"][2]["detail"], "T-1");
    assert_eq!(days["session_count"], 3);
    assert_eq!(labels(&days["groups"]), vec!["Monday", "Tuesday", "Wednesday"]);
    assert_eq!(codes(&days["groups"][1]["sessions"]), vec!["MA201"]);
}

#[tokio::test]
async fn test_unknown_grouping_is_rejected() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/view/groups")
        .add_query_param("by", "block")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Validation error: Unknown grouping: block" })
    );
}

#[tokio::test]
async fn test_telemetry_pass_through() {
    let server = TestContext::new().server();

    let grouping: Value = server.get("/api/view/telemetry/grouping").await.json();
    let validation: Value = server.get("/api/view/telemetry/validation").await.json();
    let unknown = server.get("/api/view/telemetry/horoscope").await;

    assert_eq!(grouping["domain"], "grouping");
    assert_eq!(grouping["generated"], true);
    assert_eq!(validation["generated"], false);
    assert_eq!(validation["data"], Value::Null);
    unknown.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_views_unavailable_before_first_load() {
    let mut ctx = TestContext::new();
    ctx.preload = false;
    let server = ctx.server();

    let response = server.get("/api/view/summary").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>()["error"],
        "View unavailable: no schedule loaded yet"
    );
}
