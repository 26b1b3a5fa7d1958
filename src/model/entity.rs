use serde::{Deserialize, Serialize};

/// Addresses exactly one node: a slash-separated path for tree entries, or an
/// opaque id for tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum EntityRef {
    Path(String),
    Task(String),
}

impl EntityRef {
    pub fn path(path: impl Into<String>) -> Self {
        EntityRef::Path(path.into())
    }

    pub fn task(id: impl Into<String>) -> Self {
        EntityRef::Task(id.into())
    }

    /// True if this reference is `path` itself or lives underneath it.
    pub fn is_within(&self, folder: &str) -> bool {
        match self {
            EntityRef::Path(p) => {
                folder.is_empty()
                    || p == folder
                    || p.strip_prefix(folder).is_some_and(|rest| rest.starts_with('/'))
            }
            EntityRef::Task(_) => false,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::Path(p) => write!(f, "{}", p),
            EntityRef::Task(id) => write!(f, "task:{}", id),
        }
    }
}

/// One search hit, either a note or a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchMatch {
    Note { path: String, name: String },
    Task { id: String, name: String },
}

impl SearchMatch {
    pub fn name(&self) -> &str {
        match self {
            SearchMatch::Note { name, .. } | SearchMatch::Task { name, .. } => name,
        }
    }

    pub fn entity(&self) -> EntityRef {
        match self {
            SearchMatch::Note { path, .. } => EntityRef::Path(path.clone()),
            SearchMatch::Task { id, .. } => EntityRef::Task(id.clone()),
        }
    }
}
