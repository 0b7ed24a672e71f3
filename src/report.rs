//! Prints the room summary and room timetables of the latest solver run as
//! plain text.
//!
//! Usage: `board-report [ROOM_NUMBER...]`. Without arguments every room is
//! printed.

use std::fmt::Write as _;

use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use timetable_board_api::config::ApiConfig;
use timetable_board_client::{DashboardView, load_view_model};
use timetable_board_core::grid::{GridTable, build_grid};
use timetable_board_core::models::{Day, Room, Session};
use timetable_board_core::summary::{solver_status_line, warm_start_line};
use tracing_subscriber::FmtSubscriber;

const EMPTY_CELL: &str = "-";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = config.build_source()?;
    let view = load_view_model(source.as_ref()).await?;
    let rooms: Vec<String> = std::env::args().skip(1).collect();

    print!("{}", render_report(&view, &rooms)?);
    Ok(())
}

fn render_report(view: &DashboardView, room_numbers: &[String]) -> Result<String> {
    let mut out = render_overview(view)?;

    let rooms: Vec<&Room> = if room_numbers.is_empty() {
        view.rooms.rooms.iter().collect()
    } else {
        room_numbers
            .iter()
            .map(|number| {
                view.rooms
                    .find(number)
                    .ok_or_else(|| eyre!("Room {} not found", number))
            })
            .collect::<Result<_>>()?
    };

    for room in rooms {
        writeln!(out)?;
        out.push_str(&render_room(room)?);
    }

    if room_numbers.is_empty() && !view.rooms.unassigned.is_empty() {
        writeln!(out)?;
        writeln!(out, "Unassigned sessions")?;
        for (day, sessions) in view.rooms.unassigned_by_day() {
            writeln!(out, "  {}", day)?;
            for session in sessions {
                writeln!(out, "    {:<14} {}", session.time_label, session_label(session))?;
            }
        }
    }
    Ok(out)
}

fn render_overview(view: &DashboardView) -> Result<String> {
    let mut out = String::new();
    let summary = &view.summary;
    let rooms = view.rooms.summary();

    match view.snapshot.as_ref().and_then(|s| s.folder.as_deref()) {
        Some(folder) => writeln!(out, "Timetable board · snapshot {}", folder)?,
        None => writeln!(out, "Timetable board")?,
    }
    writeln!(
        out,
        "Sessions: {} (lab {}, theory {}) · teachers {} · rooms {}",
        summary.total_sessions,
        summary.lab_sessions,
        summary.theory_sessions,
        summary.teachers,
        summary.rooms
    )?;
    writeln!(
        out,
        "Rooms: {} (lab {}, theory {}, mixed {}) · avg utilization {:.1}% · unassigned {}",
        rooms.total_rooms,
        rooms.lab_rooms,
        rooms.theory_rooms,
        rooms.mixed_rooms,
        rooms.avg_utilization,
        rooms.unassigned_sessions
    )?;
    for line in [
        view.solver.as_ref().and_then(solver_status_line),
        view.warm_start.as_ref().and_then(warm_start_line),
    ]
    .into_iter()
    .flatten()
    {
        writeln!(out, "{}", line)?;
    }
    Ok(out)
}

fn render_room(room: &Room) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "Room {} · {} · {} · {} sessions · {:.1}%",
        room.room_number,
        room.block,
        room.room_type.as_str(),
        room.session_count,
        room.utilization
    )?;
    out.push_str(&render_table(&build_grid(&room.sessions, &Day::ORDER).to_table())?);
    Ok(out)
}

/// Renders a grid as aligned text: one line per slot, one column per day.
fn render_table(table: &GridTable) -> Result<String> {
    let mut header = vec!["Time".to_string()];
    header.extend(table.columns.iter().map(|column| column.label.clone()));

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut line = vec![row.slot.clone()];
            line.extend(row.cells.iter().map(|cell| cell_text(cell)));
            line
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, text) in widths.iter_mut().zip(row) {
            *width = (*width).max(text.chars().count());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&header).chain(&rows) {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!("{:<width$}", text, width = width))
            .collect();
        writeln!(out, "  {}", padded.join(" | ").trim_end())?;
    }
    Ok(out)
}

fn cell_text(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return EMPTY_CELL.to_string();
    }
    sessions
        .iter()
        .map(session_label)
        .collect::<Vec<_>>()
        .join(" / ")
}

fn session_label(session: &Session) -> String {
    if session.group_name.is_empty() {
        session.course_code.clone()
    } else {
        format!("{} ({})", session.course_code, session.group_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use timetable_board_core::models::{Envelope, SchedulePayload};

    fn view() -> DashboardView {
        let schedule: Envelope<SchedulePayload> = serde_json::from_value(json!({
            "data": {
                "lab_entries": [
                    { "course_code": "CS391", "group_name": "CSE_S5_G1", "room_number": "L-1", "block": "Main", "day": "monday", "time_range": "8:00 - 9:40" },
                    { "course_code": "CS391", "group_name": "CSE_S5_G2", "room_number": "L-1", "block": "Main", "day": "monday", "time_range": "8:00 - 9:40" },
                ],
                "theory_entries": [
                    { "course_code": "CS301", "room_number": "A-1", "block": "Main", "day": "fri", "time_slot": "1:20 - 2:10" },
                    { "course_code": "HS101", "day": "wed", "time_slot": "9:00 - 9:50" },
                ],
            },
            "snapshot": { "folder": "run_3" },
        }))
        .unwrap();
        DashboardView::build(schedule, None, None, None)
    }

    #[test]
    fn test_room_table_lists_shared_cells() {
        let view = view();
        let room = view.rooms.find("L-1").unwrap();
        let text = render_room(room).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Room L-1 · Main · lab · 2 sessions · 20.0%");
        assert!(lines[1].starts_with("  Time        | Monday"));
        assert!(lines[2].contains("CS391 (CSE_S5_G1) / CS391 (CSE_S5_G2)"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_report_covers_overview_rooms_and_unassigned() {
        let text = render_report(&view(), &[]).unwrap();

        assert!(text.starts_with("Timetable board · snapshot run_3\n"));
        assert!(text.contains("Sessions: 4 (lab 2, theory 2)"));
        assert!(text.contains("Room A-1 · Main · theory · 1 sessions"));
        assert!(text.contains("Unassigned sessions\n  Wednesday\n    9:00 - 9:50    HS101\n"));
    }

    #[test]
    fn test_unknown_room_is_an_error() {
        let err = render_report(&view(), &["Z-9".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Z-9"));
    }
}
