//! Entry normalization: raw solver rows into canonical [`Session`]s.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::entry::RawEntry;
use crate::models::session::{
    DEFAULT_BLOCK, DEFAULT_COURSE_NAME, DEFAULT_DEPARTMENT, DEFAULT_TEACHER, Day, PLACEHOLDER,
    ScheduleType, Session, UNASSIGNED_ROOM, UNKNOWN_DAY_INDEX, UNSCHEDULED,
};
use crate::models::telemetry::SchedulePayload;
use crate::time::parse_time_label;

static GROUP_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_G(\d+)$").expect("group number pattern is valid"));

/// Converts one raw entry into a [`Session`].
///
/// `fallback` is the schedule type implied by the list the entry came from;
/// it is used when the entry does not name a recognised type itself, and
/// theory is assumed when neither does. Never fails: every absent field is
/// replaced by its display default.
pub fn normalize(entry: &RawEntry, fallback: Option<ScheduleType>) -> Session {
    let schedule_type = entry
        .schedule_type
        .as_deref()
        .and_then(ScheduleType::parse)
        .or(fallback)
        .unwrap_or(ScheduleType::Theory);

    let day = entry
        .day
        .as_deref()
        .map(|day| day.trim().to_lowercase())
        .unwrap_or_default();
    let known_day = Day::from_key(&day);

    let time_label = [&entry.time_slot, &entry.time_range, &entry.session_name]
        .into_iter()
        .find_map(|label| label.clone())
        .unwrap_or_else(|| UNSCHEDULED.to_string());
    let (hour, minute) = parse_time_label(&time_label);

    let group_name = text_or(&entry.group_name, "");

    Session {
        schedule_type,
        session_type: text_or(&entry.session_type, schedule_type.as_str()),
        course_code: text_or(&entry.course_code, PLACEHOLDER),
        course_name: text_or(&entry.course_name, DEFAULT_COURSE_NAME),
        department: text_or(&entry.department, DEFAULT_DEPARTMENT),
        semester: entry.semester.clone(),
        group_number: group_number(&group_name),
        group_name,
        group_index: entry.group_index.clone(),
        teacher_name: text_or(&entry.teacher_name, DEFAULT_TEACHER),
        teacher_id: text_or(&entry.teacher_id, ""),
        staff_code: text_or(&entry.staff_code, ""),
        room_number: text_or(&entry.room_number, UNASSIGNED_ROOM),
        room_id: text_or(&entry.room_id, ""),
        block: text_or(&entry.block, DEFAULT_BLOCK),
        capacity: entry.capacity.clone(),
        day_label: known_day.map_or(UNSCHEDULED, Day::label).to_string(),
        day_index: known_day.map_or(UNKNOWN_DAY_INDEX, Day::index),
        day,
        day_pattern: text_or(&entry.day_pattern, ""),
        time_label,
        hour,
        minute,
        time_key: hour * 60 + minute,
        session_number: entry.session_number.clone(),
        slot_index: entry.slot_index.clone(),
        student_count: entry
            .student_count
            .clone()
            .or_else(|| entry.total_students.clone()),
        is_batched: entry.is_batched.unwrap_or(false),
    }
}

/// Normalizes a whole schedule export into chronological order.
///
/// Theory entries come first in encounter order, then lab entries; the
/// stable sort keeps that order between sessions sharing a day and start.
pub fn normalize_payload(payload: &SchedulePayload) -> Vec<Session> {
    let theory = payload
        .theory_entries
        .iter()
        .map(|entry| normalize(entry, Some(ScheduleType::Theory)));
    let labs = payload
        .lab_entries
        .iter()
        .map(|entry| normalize(entry, Some(ScheduleType::Lab)));

    let mut sessions: Vec<Session> = theory.chain(labs).collect();
    sort_sessions(&mut sessions);
    sessions
}

/// Stable sort by `(day_index, time_key)`.
pub fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by_key(Session::sort_key);
}

/// Number of a batch group named like `CSE_S3_G2`.
pub fn group_number(group_name: &str) -> Option<u32> {
    GROUP_NUMBER
        .captures(group_name)
        .and_then(|captures| captures[1].parse().ok())
}

fn text_or(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}
