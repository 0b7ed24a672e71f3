//! Grouped timetable views: sessions by department, semester, room, teacher
//! or day, each group with its lab and theory counts.
//!
//! Groups keep their sessions in encounter order, so a chronologically
//! sorted input gives chronologically sorted groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::session::{PLACEHOLDER, ScheduleType, Session};
use crate::semester::compare_semesters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    /// Departments, each split by semester.
    Department,
    /// Semesters, each split by department.
    Semester,
    /// Rooms, keyed by room number and block.
    Room,
    /// Teachers, keyed by name and staff code.
    Teacher,
    Day,
}

impl GroupKey {
    pub const ALL: [GroupKey; 5] = [
        GroupKey::Department,
        GroupKey::Semester,
        GroupKey::Room,
        GroupKey::Teacher,
        GroupKey::Day,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupKey::Department => "department",
            GroupKey::Semester => "semester",
            GroupKey::Room => "room",
            GroupKey::Teacher => "teacher",
            GroupKey::Day => "day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionGroup {
    pub label: String,
    /// Day pattern for departments, capacity for rooms, staff code for
    /// teachers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub session_count: usize,
    pub lab_sessions: usize,
    pub theory_sessions: usize,
    /// Second-level groups; when present they hold the sessions instead.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subgroups: Vec<SessionGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<Session>,
}

impl SessionGroup {
    fn leaf(label: String, detail: Option<String>, sessions: Vec<&Session>) -> Self {
        let lab_sessions = sessions
            .iter()
            .filter(|s| s.schedule_type == ScheduleType::Lab)
            .count();
        Self {
            label,
            detail,
            session_count: sessions.len(),
            lab_sessions,
            theory_sessions: sessions.len() - lab_sessions,
            subgroups: Vec::new(),
            sessions: sessions.into_iter().cloned().collect(),
        }
    }

    fn nested(label: String, detail: Option<String>, subgroups: Vec<SessionGroup>) -> Self {
        Self {
            label,
            detail,
            session_count: subgroups.iter().map(|g| g.session_count).sum(),
            lab_sessions: subgroups.iter().map(|g| g.lab_sessions).sum(),
            theory_sessions: subgroups.iter().map(|g| g.theory_sessions).sum(),
            subgroups,
            sessions: Vec::new(),
        }
    }
}

/// Groups sessions by `key`.
///
/// Sessions without a semester form a trailing `—` group, and sessions on
/// an unrecognised day a trailing `Unscheduled` group, so nothing is
/// dropped.
pub fn group_sessions<'a>(
    sessions: impl IntoIterator<Item = &'a Session>,
    key: GroupKey,
) -> Vec<SessionGroup> {
    let sessions: Vec<&'a Session> = sessions.into_iter().collect();

    match key {
        GroupKey::Department => by_department(sessions)
            .into_iter()
            .map(|(department, sessions)| {
                let detail = non_empty(&sessions[0].day_pattern);
                let semesters = by_semester(sessions)
                    .into_iter()
                    .map(|(semester, sessions)| SessionGroup::leaf(semester, None, sessions))
                    .collect();
                SessionGroup::nested(department, detail, semesters)
            })
            .collect(),
        GroupKey::Semester => by_semester(sessions)
            .into_iter()
            .map(|(semester, sessions)| {
                let departments = by_department(sessions)
                    .into_iter()
                    .map(|(department, sessions)| SessionGroup::leaf(department, None, sessions))
                    .collect();
                SessionGroup::nested(semester, None, departments)
            })
            .collect(),
        GroupKey::Room => bucket(sessions, |s| (s.room_number.clone(), s.block.clone()))
            .into_iter()
            .map(|((room_number, block), sessions)| {
                let detail = sessions[0].capacity.as_ref().map(ToString::to_string);
                SessionGroup::leaf(format!("{} - {}", room_number, block), detail, sessions)
            })
            .collect(),
        GroupKey::Teacher => bucket(sessions, |s| (s.teacher_name.clone(), staff_code(s)))
            .into_iter()
            .map(|((teacher, code), sessions)| {
                SessionGroup::leaf(teacher, non_empty(&code), sessions)
            })
            .collect(),
        GroupKey::Day => bucket(sessions, |s| s.day_index)
            .into_values()
            .map(|sessions| SessionGroup::leaf(sessions[0].day_label.clone(), None, sessions))
            .collect(),
    }
}

fn by_department(sessions: Vec<&Session>) -> Vec<(String, Vec<&Session>)> {
    bucket(sessions, |s| s.department.clone()).into_iter().collect()
}

/// Semester buckets in semester order, with the missing semester last.
fn by_semester(sessions: Vec<&Session>) -> Vec<(String, Vec<&Session>)> {
    let mut groups: Vec<(String, Vec<&Session>)> = bucket(sessions, Session::semester_label)
        .into_iter()
        .collect();
    groups.sort_by(|(_, a), (_, b)| match (&a[0].semester, &b[0].semester) {
        (Some(x), Some(y)) => compare_semesters(x, y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    groups
}

/// Every bucket is non-empty.
fn bucket<'a, K: Ord>(
    sessions: Vec<&'a Session>,
    key: impl Fn(&Session) -> K,
) -> BTreeMap<K, Vec<&'a Session>> {
    let mut buckets: BTreeMap<K, Vec<&'a Session>> = BTreeMap::new();
    for session in sessions {
        buckets.entry(key(session)).or_default().push(session);
    }
    buckets
}

fn staff_code(session: &Session) -> String {
    if session.staff_code.is_empty() {
        session.teacher_id.clone()
    } else {
        session.staff_code.clone()
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty() && text != PLACEHOLDER).then(|| text.to_string())
}
