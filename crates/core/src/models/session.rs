use std::fmt;

use serde::{Deserialize, Serialize};

use super::entry::Scalar;

/// Label used when an entry carries no time descriptor at all.
pub const UNSCHEDULED: &str = "Unscheduled";
/// Room number of sessions the solver has not placed yet.
pub const UNASSIGNED_ROOM: &str = "TBD";
/// Display value for absent scalar fields.
pub const PLACEHOLDER: &str = "—";

pub const DEFAULT_COURSE_NAME: &str = "Untitled course";
pub const DEFAULT_DEPARTMENT: &str = "Unknown department";
pub const DEFAULT_TEACHER: &str = "TBA";
pub const DEFAULT_BLOCK: &str = "Unassigned block";

/// Sort rank for days outside the canonical week.
pub const UNKNOWN_DAY_INDEX: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Lab,
    Theory,
}

impl ScheduleType {
    /// Parses a raw schedule type tag, ignoring case and surrounding space.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "lab" => Some(ScheduleType::Lab),
            "theory" => Some(ScheduleType::Theory),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleType::Lab => "lab",
            ScheduleType::Theory => "theory",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The teaching week, in timetable order.
///
/// Keys are the abbreviations the solver emits (`wed`, `thur`, `fri`), which
/// is why they differ from the display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "monday")]
    Monday,
    #[serde(rename = "tuesday")]
    Tuesday,
    #[serde(rename = "wed")]
    Wednesday,
    #[serde(rename = "thur")]
    Thursday,
    #[serde(rename = "fri")]
    Friday,
    #[serde(rename = "saturday")]
    Saturday,
}

impl Day {
    pub const ORDER: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Looks up a day by its exact solver key. Full names such as
    /// `"wednesday"` are not keys and return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Day::ORDER.into_iter().find(|day| day.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wed",
            Day::Thursday => "thur",
            Day::Friday => "fri",
            Day::Saturday => "saturday",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A scheduled class occurrence in canonical, render-ready form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub schedule_type: ScheduleType,
    pub session_type: String,
    pub course_code: String,
    pub course_name: String,
    pub department: String,
    pub semester: Option<Scalar>,
    pub group_name: String,
    pub group_index: Option<Scalar>,
    pub group_number: Option<u32>,
    pub teacher_name: String,
    pub teacher_id: String,
    pub staff_code: String,
    pub room_number: String,
    pub room_id: String,
    pub block: String,
    pub capacity: Option<Scalar>,
    pub day: String,
    pub day_label: String,
    pub day_index: u8,
    pub day_pattern: String,
    pub time_label: String,
    pub hour: u32,
    pub minute: u32,
    pub time_key: u32,
    pub session_number: Option<Scalar>,
    pub slot_index: Option<Scalar>,
    pub student_count: Option<Scalar>,
    pub is_batched: bool,
}

impl Session {
    /// Chronological ordering key: day first, then start time.
    pub fn sort_key(&self) -> (u8, u32) {
        (self.day_index, self.time_key)
    }

    pub fn day(&self) -> Option<Day> {
        Day::from_key(&self.day)
    }

    /// True when the solver left this session without a room.
    pub fn is_unassigned(&self) -> bool {
        self.room_number == UNASSIGNED_ROOM && self.room_id.is_empty()
    }

    pub fn semester_label(&self) -> String {
        scalar_label(self.semester.as_ref())
    }

    pub fn session_number_label(&self) -> String {
        scalar_label(self.session_number.as_ref())
    }

    pub fn student_count_label(&self) -> String {
        scalar_label(self.student_count.as_ref())
    }
}

fn scalar_label(value: Option<&Scalar>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), Scalar::to_string)
}
