pub mod entry;
pub mod room;
pub mod session;
pub mod telemetry;

pub use entry::{RawEntry, Scalar};
pub use room::{Room, RoomIndex, RoomSummary, RoomType};
pub use session::{Day, ScheduleType, Session};
pub use telemetry::{
    Envelope, Metrics, SchedulePayload, Snapshot, SolverMetrics, TelemetryDomain,
    TelemetryReport, WarmStart,
};
