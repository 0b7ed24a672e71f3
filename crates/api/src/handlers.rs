/// Solver telemetry pass-through
pub mod telemetry;
/// Views derived from the loaded schedule
pub mod view;
