use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::io::fs_store::atomic_write;
use crate::model::{EntityRef, Layout};

/// Directory for client-side files inside the notes root
pub const CLIENT_DIR: &str = ".quill";
const STATE_FILE: &str = "state.json";

/// Persisted TUI state (written to `.quill/state.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Layout last used in note mode
    #[serde(default)]
    pub note_layout: Option<Layout>,
    /// Sidebar keys that were expanded
    #[serde(default)]
    pub expanded: BTreeSet<String>,
    /// Entity open when the TUI last exited
    #[serde(default)]
    pub last_entity: Option<EntityRef>,
    #[serde(default)]
    pub last_search: Option<String>,
}

pub fn client_dir(notes_dir: &Path) -> PathBuf {
    notes_dir.join(CLIENT_DIR)
}

/// Read `.quill/state.json`. Missing or malformed files read as `None`.
pub fn read_ui_state(notes_dir: &Path) -> Option<UiState> {
    let path = client_dir(notes_dir).join(STATE_FILE);
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write `.quill/state.json`, creating the directory if needed.
pub fn write_ui_state(notes_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let dir = client_dir(notes_dir);
    fs::create_dir_all(&dir)?;
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&dir.join(STATE_FILE), content.as_bytes())
}
