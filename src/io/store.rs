use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{
    SearchMatch, Settings, SettingsPatch, TagGroup, TaskDraft, TaskRecord, TreeNode,
    ValidationError,
};

/// Shown when a store failure carries no message of its own.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Error type for content store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
}

impl StoreError {
    /// Message for the status row: the store's own text, or a generic fallback.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Invalid(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListing {
    pub tasks: Vec<TaskRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsListing {
    pub settings: Settings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteContent {
    pub path: String,
    pub content: String,
    pub modified: DateTime<Utc>,
}

/// Everything the workspace needs from wherever notes, tasks and settings live.
///
/// Paths are slash-separated and relative to the notes root. Mutating calls
/// return the path actually written, which may differ from the input after
/// normalization (e.g. an added `.md`).
pub trait ContentStore {
    fn get_tree(&self, prefix: Option<&str>) -> Result<TreeNode, StoreError>;
    fn get_tags(&self) -> Result<Vec<TagGroup>, StoreError>;
    fn get_tasks(&self) -> Result<TaskListing, StoreError>;
    fn get_settings(&self) -> Result<SettingsListing, StoreError>;

    fn get_note(&self, path: &str) -> Result<NoteContent, StoreError>;
    fn create_note(&self, path: &str, content: &str) -> Result<String, StoreError>;
    fn update_note(&self, path: &str, content: &str) -> Result<String, StoreError>;
    fn delete_note(&self, path: &str) -> Result<(), StoreError>;
    fn rename_note(&self, path: &str, new_path: &str) -> Result<String, StoreError>;

    fn create_folder(&self, path: &str) -> Result<String, StoreError>;
    fn rename_folder(&self, path: &str, new_path: &str) -> Result<String, StoreError>;
    fn delete_folder(&self, path: &str) -> Result<(), StoreError>;

    fn get_task(&self, id: &str) -> Result<TaskRecord, StoreError>;
    fn create_task(&self, draft: &TaskDraft) -> Result<TaskRecord, StoreError>;
    fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<TaskRecord, StoreError>;
    fn delete_task(&self, id: &str) -> Result<(), StoreError>;

    fn update_settings(&self, patch: &SettingsPatch) -> Result<Settings, StoreError>;

    fn search(&self, query: &str) -> Result<Vec<SearchMatch>, StoreError>;

    /// Raw bytes of any file under the root (assets, pdfs, csvs).
    fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError>;
}
