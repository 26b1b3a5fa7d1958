//! The stateful core: one owned [`WorkspaceState`], the [`ModeController`]
//! that drives it, and the two time-driven services it owns.

pub mod autosave;
pub mod controller;
#[cfg(test)]
pub(crate) mod memory_store;
pub mod scroll_sync;
pub mod state;

pub use autosave::AutosaveScheduler;
pub use controller::ModeController;
pub use scroll_sync::{Pane, ScrollMetrics, ScrollSync};
pub use state::*;

use crate::io::store::StoreError;
use crate::model::ValidationError;

/// Error type for workspace operations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", .0.user_message())]
    Store(#[from] StoreError),
    #[error("nothing to save")]
    NothingToSave,
    #[error("a save is already in progress")]
    SaveInFlight,
}

impl WorkspaceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkspaceError::Store(e) if e.is_not_found())
    }
}
