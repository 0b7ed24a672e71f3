//! Loading the timetable board's view-model from the solver service.

pub mod mock;
pub mod source;
pub mod store;
pub mod view;

pub use source::{FileSource, HttpSource, TelemetrySource};
pub use store::{ApplyOutcome, RequestToken, ViewState, ViewStore};
pub use view::{DashboardView, load_view_model};
