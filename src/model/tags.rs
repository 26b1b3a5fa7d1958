use serde::{Deserialize, Serialize};

/// A note that contains a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRef {
    pub path: String,
    pub name: String,
}

/// One tag and the notes it occurs in, in store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    pub tag: String,
    #[serde(default)]
    pub notes: Vec<NoteRef>,
}
