//! Hiding timetables of semesters whose display is switched off.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::entry::Scalar;
use crate::models::session::Session;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("digits pattern is valid"));
static GROUP_SEMESTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_S(\d+)_|_S(\d+)$|S(\d+)").expect("group semester pattern is valid")
});

/// Numeric semesters first in numeric order, then the rest alphabetically.
pub fn compare_semesters(a: &Scalar, b: &Scalar) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_string().cmp(&b.to_string()),
    }
}

/// Semester a session belongs to.
///
/// Read from the semester field when it is numeric or contains digits
/// (`"S4"`), otherwise from a group name such as `CSE_S4_G1`.
pub fn semester_number(session: &Session) -> Option<u32> {
    let from_field = session.semester.as_ref().and_then(|semester| match semester {
        Scalar::Int(value) => u32::try_from(*value).ok(),
        Scalar::Float(value) if value.fract() == 0.0 && *value >= 0.0 => Some(*value as u32),
        Scalar::Float(_) => None,
        Scalar::Text(text) => DIGITS
            .captures(text)
            .and_then(|captures| captures[1].parse().ok()),
    });

    from_field.or_else(|| {
        GROUP_SEMESTER.captures(&session.group_name).and_then(|captures| {
            captures
                .iter()
                .skip(1)
                .flatten()
                .find_map(|group| group.as_str().parse().ok())
        })
    })
}

/// Set of semesters whose timetables must not be displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterGate {
    disabled: BTreeSet<u32>,
}

/// Sessions left visible by a [`SemesterGate`].
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome<'a> {
    pub visible: Vec<&'a Session>,
    /// Disabled semesters that hid at least one session, ascending.
    pub hidden_semesters: Vec<u32>,
}

impl GateOutcome<'_> {
    /// True when there was data but every session was hidden, which the
    /// views report instead of an empty timetable.
    pub fn fully_disabled(&self) -> bool {
        self.visible.is_empty() && !self.hidden_semesters.is_empty()
    }
}

impl SemesterGate {
    pub fn new(disabled: impl IntoIterator<Item = u32>) -> Self {
        Self {
            disabled: disabled.into_iter().collect(),
        }
    }

    pub fn is_disabled(&self, session: &Session) -> bool {
        semester_number(session).is_some_and(|semester| self.disabled.contains(&semester))
    }

    /// Splits sessions into visible ones and the disabled semesters that
    /// were hidden. Sessions with no recognisable semester stay visible.
    pub fn apply<'a>(&self, sessions: impl IntoIterator<Item = &'a Session>) -> GateOutcome<'a> {
        let mut visible = Vec::new();
        let mut hidden = BTreeSet::new();
        for session in sessions {
            match semester_number(session) {
                Some(semester) if self.disabled.contains(&semester) => {
                    hidden.insert(semester);
                }
                _ => visible.push(session),
            }
        }
        GateOutcome {
            visible,
            hidden_semesters: hidden.into_iter().collect(),
        }
    }

    pub fn disabled(&self) -> impl Iterator<Item = u32> + '_ {
        self.disabled.iter().copied()
    }
}
