//! # Timetable Board Core
//!
//! Headless view-model building for the timetable board: raw solver exports
//! go in, canonical sessions, room buckets and day x slot grids come out.
//! Every transform here is pure and total. Malformed fields degrade to
//! display defaults instead of failing, so a load never aborts because of a
//! single bad row.
//!
//! The pipeline is:
//!
//! - [`normalize`]: raw entries into [`models::Session`]s
//! - [`rooms::aggregate`]: sessions into [`models::RoomIndex`]
//! - [`grid::build_grid`]: sessions into a [`grid::ScheduleGrid`]
//! - [`groups::group_sessions`]: sessions into grouped views

pub mod errors;
pub mod filter;
pub mod grid;
pub mod groups;
pub mod models;
pub mod normalize;
pub mod rooms;
pub mod semester;
pub mod summary;
pub mod time;
