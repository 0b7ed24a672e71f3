//! The current dashboard view and the guard against stale loads.
//!
//! Every load takes a token from [`ViewStore::begin`]. When it completes,
//! [`ViewStore::apply`] accepts the result only if no newer load has been
//! started since, so a slow response can never overwrite a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{error, info, warn};

use timetable_board_core::errors::{BoardError, BoardResult};

use crate::source::TelemetrySource;
use crate::view::{DashboardView, load_view_model};

/// Identifies one load; later loads get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// Nothing has been loaded yet.
    #[default]
    Empty,
    Ready(Arc<DashboardView>),
    /// The latest load failed; the message is shown in place of the view.
    Failed(String),
}

impl ViewState {
    pub fn view(&self) -> Option<&Arc<DashboardView>> {
        match self {
            ViewState::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Whether a completed load changed the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Discarded,
}

#[derive(Debug, Default)]
pub struct ViewStore {
    latest: AtomicU64,
    state: RwLock<ViewState>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load, superseding any load still in flight.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Records the result of the load started with `token`.
    ///
    /// A failure replaces whatever view was shown, so an old grid is never
    /// served after a failed refresh.
    pub fn apply(&self, token: RequestToken, result: BoardResult<DashboardView>) -> ApplyOutcome {
        match result {
            Ok(view) => self.commit(token, ViewState::Ready(Arc::new(view))),
            Err(e) => self.fail(token, &e),
        }
    }

    fn fail(&self, token: RequestToken, err: &BoardError) -> ApplyOutcome {
        let outcome = self.commit(token, ViewState::Failed(err.to_string()));
        if outcome == ApplyOutcome::Applied {
            error!("Failed to load view: {}", err);
        }
        outcome
    }

    fn commit(&self, token: RequestToken, next: ViewState) -> ApplyOutcome {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Checked under the write lock so two completions cannot interleave.
        if !self.is_current(token) {
            warn!("Discarding stale load {:?}", token);
            return ApplyOutcome::Discarded;
        }
        *state = next;
        ApplyOutcome::Applied
    }

    pub fn state(&self) -> ViewState {
        match self.state.read() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The ready view, or the reason there is none.
    pub fn current(&self) -> BoardResult<Arc<DashboardView>> {
        match self.state() {
            ViewState::Ready(view) => Ok(view),
            ViewState::Failed(message) => Err(BoardError::Unavailable(message)),
            ViewState::Empty => Err(BoardError::Unavailable("no schedule loaded yet".to_string())),
        }
    }

    /// Loads a fresh view from `source` and applies it.
    ///
    /// The load error is returned even when a newer load made it stale.
    pub async fn refresh(&self, source: &dyn TelemetrySource) -> BoardResult<ApplyOutcome> {
        let token = self.begin();
        info!("Starting load {:?}", token);

        match load_view_model(source).await {
            Ok(view) => Ok(self.commit(token, ViewState::Ready(Arc::new(view)))),
            Err(e) => {
                self.fail(token, &e);
                Err(e)
            }
        }
    }
}
