//! Room aggregation: sessions grouped into per-room buckets.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::entry::Scalar;
use crate::models::room::{Room, RoomIndex, RoomSummary, RoomType};
use crate::models::session::{ScheduleType, Session};
use crate::normalize::sort_sessions;

/// Upper bound of the utilization heuristic.
const MAX_UTILIZATION: f64 = 100.0;
/// Utilization points per session per active day.
const POINTS_PER_SESSION: f64 = 10.0;

#[derive(Default)]
struct RoomBucket {
    room_id: String,
    block: String,
    capacity: Option<Scalar>,
    types: BTreeSet<ScheduleType>,
    sessions: Vec<Session>,
}

/// Groups sessions by room number and separates the unassigned ones.
///
/// The first session seen for a room fixes its id and block; capacity is
/// taken from the first session that has one. Rooms come back ordered by
/// `(block, room_number)`, each with its sessions in chronological order.
pub fn aggregate<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> RoomIndex {
    let mut buckets: BTreeMap<String, RoomBucket> = BTreeMap::new();
    let mut unassigned = Vec::new();

    for session in sessions {
        if session.is_unassigned() {
            unassigned.push(session.clone());
            continue;
        }

        let bucket = buckets
            .entry(session.room_number.clone())
            .or_insert_with(|| RoomBucket {
                room_id: session.room_id.clone(),
                block: session.block.clone(),
                ..RoomBucket::default()
            });
        if bucket.capacity.is_none() {
            bucket.capacity = session.capacity.clone();
        }
        bucket.types.insert(session.schedule_type);
        bucket.sessions.push(session.clone());
    }

    let mut rooms: Vec<Room> = buckets
        .into_iter()
        .map(|(room_number, bucket)| finish_room(room_number, bucket))
        .collect();
    rooms.sort_by(|a, b| {
        a.block
            .cmp(&b.block)
            .then_with(|| a.room_number.cmp(&b.room_number))
    });

    RoomIndex { rooms, unassigned }
}

fn finish_room(room_number: String, bucket: RoomBucket) -> Room {
    let RoomBucket {
        room_id,
        block,
        capacity,
        types,
        mut sessions,
    } = bucket;

    sort_sessions(&mut sessions);
    let utilization = utilization(&sessions);

    Room {
        room_number,
        room_id,
        block,
        capacity,
        room_type: RoomType::from_types(types),
        session_count: sessions.len(),
        utilization,
        sessions,
    }
}

/// Sessions per active day, scaled by ten and capped at 100, one decimal.
pub fn utilization(sessions: &[Session]) -> f64 {
    let active_days = sessions
        .iter()
        .map(|session| session.day.as_str())
        .filter(|day| !day.is_empty())
        .collect::<HashSet<_>>()
        .len()
        .max(1);
    let score = (sessions.len() as f64 / active_days as f64) * POINTS_PER_SESSION;
    round_tenth(score.min(MAX_UTILIZATION))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl RoomIndex {
    pub fn find(&self, room_number: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.room_number == room_number)
    }

    /// Distinct non-empty blocks, sorted.
    pub fn blocks(&self) -> Vec<&str> {
        self.rooms
            .iter()
            .map(|room| room.block.as_str())
            .filter(|block| !block.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn summary(&self) -> RoomSummary {
        let count = |room_type: RoomType| {
            self.rooms
                .iter()
                .filter(|room| room.room_type == room_type)
                .count()
        };
        let total_rooms = self.rooms.len();
        let avg_utilization = if total_rooms == 0 {
            0.0
        } else {
            let sum: f64 = self.rooms.iter().map(|room| room.utilization).sum();
            round_tenth(sum / total_rooms as f64)
        };

        RoomSummary {
            total_rooms,
            lab_rooms: count(RoomType::Lab),
            theory_rooms: count(RoomType::Theory),
            mixed_rooms: count(RoomType::Mixed),
            avg_utilization,
            unassigned_sessions: self.unassigned.len(),
        }
    }

    /// Unassigned sessions grouped under their day label, days in the order
    /// they were first encountered.
    pub fn unassigned_by_day(&self) -> Vec<(&str, Vec<&Session>)> {
        let mut groups: Vec<(&str, Vec<&Session>)> = Vec::new();
        for session in &self.unassigned {
            let label = session.day_label.as_str();
            match groups.iter_mut().find(|(day, _)| *day == label) {
                Some((_, sessions)) => sessions.push(session),
                None => groups.push((label, vec![session])),
            }
        }
        groups
    }
}
