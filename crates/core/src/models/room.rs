use serde::{Deserialize, Serialize};

use super::entry::Scalar;
use super::session::{ScheduleType, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Lab,
    Theory,
    Mixed,
    Unknown,
}

impl RoomType {
    /// Classifies a room from the distinct schedule types hosted in it.
    pub fn from_types(types: impl IntoIterator<Item = ScheduleType>) -> Self {
        let (mut lab, mut theory) = (false, false);
        for schedule_type in types {
            match schedule_type {
                ScheduleType::Lab => lab = true,
                ScheduleType::Theory => theory = true,
            }
        }
        match (lab, theory) {
            (false, false) => RoomType::Unknown,
            (true, false) => RoomType::Lab,
            (false, true) => RoomType::Theory,
            (true, true) => RoomType::Mixed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Lab => "lab",
            RoomType::Theory => "theory",
            RoomType::Mixed => "mixed",
            RoomType::Unknown => "unknown",
        }
    }
}

/// All sessions placed in one room, with derived occupancy figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub room_number: String,
    pub room_id: String,
    pub block: String,
    pub capacity: Option<Scalar>,
    pub room_type: RoomType,
    pub session_count: usize,
    /// Busyness heuristic in `[0, 100]`, one decimal. Not an occupancy ratio.
    pub utilization: f64,
    pub sessions: Vec<Session>,
}

/// Result of room aggregation: room buckets plus sessions with no room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomIndex {
    pub rooms: Vec<Room>,
    pub unassigned: Vec<Session>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub total_rooms: usize,
    pub lab_rooms: usize,
    pub theory_rooms: usize,
    pub mixed_rooms: usize,
    pub avg_utilization: f64,
    pub unassigned_sessions: usize,
}
