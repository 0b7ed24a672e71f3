//! Session and room filters behind the timetable's dropdowns and search boxes.
//!
//! Every criterion is optional; an absent or blank criterion matches
//! everything, so a filter deserialized from an empty query string is a
//! no-op.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::entry::Scalar;
use crate::models::room::Room;
use crate::models::session::Session;
use crate::semester::compare_semesters;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFilter {
    pub department: Option<String>,
    /// Compared with the semester's display form, so `"3"` matches 3 and 3.0.
    pub semester: Option<String>,
    pub group: Option<String>,
    /// Solver day key, e.g. `wed`.
    pub day: Option<String>,
    /// `lab` or `theory`.
    pub schedule_type: Option<String>,
    pub day_pattern: Option<String>,
    /// Free text over course, teacher, room and group.
    pub search: Option<String>,
    pub course_search: Option<String>,
    pub teacher_search: Option<String>,
    pub room_search: Option<String>,
}

impl SessionFilter {
    pub fn matches(&self, session: &Session) -> bool {
        if let Some(department) = active(&self.department) {
            if session.department != department {
                return false;
            }
        }
        if let Some(semester) = active(&self.semester) {
            if session.semester_label() != semester {
                return false;
            }
        }
        if let Some(group) = active(&self.group) {
            if session.group_name != group {
                return false;
            }
        }
        if let Some(day) = active(&self.day) {
            if session.day != day.to_lowercase() {
                return false;
            }
        }
        if let Some(schedule_type) = active(&self.schedule_type) {
            if !session.schedule_type.as_str().eq_ignore_ascii_case(schedule_type) {
                return false;
            }
        }
        if let Some(day_pattern) = active(&self.day_pattern) {
            if session.day_pattern != day_pattern {
                return false;
            }
        }
        if let Some(search) = active(&self.search) {
            let haystack = [
                session.course_code.as_str(),
                session.course_name.as_str(),
                session.teacher_name.as_str(),
                session.room_number.as_str(),
                session.group_name.as_str(),
            ]
            .join(" ");
            if !contains_folded(&haystack, search) {
                return false;
            }
        }
        if let Some(course) = active(&self.course_search) {
            if !contains_folded(&session.course_code, course)
                && !contains_folded(&session.course_name, course)
            {
                return false;
            }
        }
        if let Some(teacher) = active(&self.teacher_search) {
            if !contains_folded(&session.teacher_name, teacher) {
                return false;
            }
        }
        if let Some(room) = active(&self.room_search) {
            if !contains_folded(&session.room_number, room) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, sessions: &'a [Session]) -> Vec<&'a Session> {
        sessions
            .iter()
            .filter(|session| self.matches(session))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomFilter {
    pub block: Option<String>,
    /// `lab`, `theory`, `mixed` or `unknown`.
    pub room_type: Option<String>,
    /// Free text over room number, room id and block.
    pub search: Option<String>,
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        if let Some(block) = active(&self.block) {
            if room.block != block {
                return false;
            }
        }
        if let Some(room_type) = active(&self.room_type) {
            if !room.room_type.as_str().eq_ignore_ascii_case(room_type) {
                return false;
            }
        }
        if let Some(search) = active(&self.search) {
            let haystack = format!("{} {} {}", room.room_number, room.room_id, room.block);
            if !contains_folded(&haystack, search) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, rooms: &'a [Room]) -> Vec<&'a Room> {
        rooms.iter().filter(|room| self.matches(room)).collect()
    }
}

/// Values available to each filter control, derived from the loaded data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub semesters: Vec<String>,
    pub groups: Vec<String>,
    pub day_patterns: Vec<String>,
    pub blocks: Vec<String>,
}

impl FilterOptions {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let distinct = |field: fn(&Session) -> &str| -> Vec<String> {
            sessions
                .iter()
                .map(field)
                .filter(|value| !value.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        Self {
            departments: distinct(|s| s.department.as_str()),
            semesters: sorted_semesters(sessions),
            groups: distinct(|s| s.group_name.as_str()),
            day_patterns: distinct(|s| s.day_pattern.as_str()),
            blocks: distinct(|s| s.block.as_str()),
        }
    }
}

/// Distinct semesters, numeric ones first in numeric order, then the rest
/// alphabetically.
fn sorted_semesters(sessions: &[Session]) -> Vec<String> {
    let mut semesters: Vec<&Scalar> = Vec::new();
    for semester in sessions.iter().filter_map(|s| s.semester.as_ref()) {
        if !semesters.iter().any(|seen| seen.to_string() == semester.to_string()) {
            semesters.push(semester);
        }
    }
    semesters.sort_by(|a, b| compare_semesters(a, b));
    semesters.into_iter().map(Scalar::to_string).collect()
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
