/// A user-facing validation failure. Raised before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    TitleRequired,
    #[error("priority must be between 1 and 5 (got {0})")]
    PriorityOutOfRange(i64),
    #[error("duedate must be YYYY-MM-DD (got {0:?})")]
    InvalidDueDate(String),
    #[error("defaultView must be edit, preview, or split (got {0:?})")]
    InvalidLayout(String),
    #[error("autosaveIntervalSeconds must be at least 5 seconds (got {0})")]
    AutosaveIntervalTooShort(u32),
    #[error("sidebarWidth must be between 220 and 600 (got {0})")]
    SidebarWidthOutOfRange(u32),
    #[error("{0}")]
    InvalidPath(String),
    #[error("{0}")]
    InvalidSetting(String),
}
