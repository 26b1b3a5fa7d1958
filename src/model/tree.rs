use serde::{Deserialize, Serialize};

/// The kind of a tree entry, used when classifying files on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Folder,
    Note,
    Asset,
    Pdf,
    Csv,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "tif", "tiff", "avif", "heic",
];

impl NodeKind {
    /// Classify a file name. Returns `None` for files the workspace hides.
    ///
    /// `*.template` files count as notes only when templates are shown.
    pub fn classify_file(name: &str, show_templates: bool) -> Option<NodeKind> {
        if is_ignored(name) {
            return None;
        }
        let ext = extension(name);
        match ext.as_deref() {
            Some("md") => Some(NodeKind::Note),
            Some("template") if show_templates => Some(NodeKind::Note),
            Some("pdf") => Some(NodeKind::Pdf),
            Some("csv") => Some(NodeKind::Csv),
            Some(e) if IMAGE_EXTENSIONS.contains(&e) => Some(NodeKind::Asset),
            _ => None,
        }
    }

    /// Sort rank within a folder listing.
    pub fn rank(self) -> u8 {
        match self {
            NodeKind::Folder => 0,
            NodeKind::Note => 1,
            NodeKind::Asset => 2,
            NodeKind::Pdf => 3,
            NodeKind::Csv => 4,
        }
    }
}

/// AppleDouble sidecar files (`._name`) are never shown.
pub fn is_ignored(name: &str) -> bool {
    name.starts_with("._")
}

pub fn is_markdown(name: &str) -> bool {
    extension(name).as_deref() == Some("md")
}

pub fn is_template(name: &str) -> bool {
    extension(name).as_deref() == Some("template")
}

/// Notes are markdown files and folder templates.
pub fn is_note_file(name: &str) -> bool {
    is_markdown(name) || is_template(name)
}

fn extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// A node of the content tree as returned by the store.
///
/// Children keep the order the store returned them in; nothing in the
/// workspace re-sorts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Folder {
        name: String,
        path: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<TreeNode>,
    },
    #[serde(rename = "file")]
    Note { name: String, path: String },
    Asset { name: String, path: String },
    Pdf { name: String, path: String },
    Csv { name: String, path: String },
}

impl TreeNode {
    pub fn folder(name: impl Into<String>, path: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode::Folder {
            name: name.into(),
            path: path.into(),
            children,
        }
    }

    /// Build a leaf of the given kind. Folders get no children.
    pub fn leaf(kind: NodeKind, name: impl Into<String>, path: impl Into<String>) -> Self {
        let (name, path) = (name.into(), path.into());
        match kind {
            NodeKind::Folder => TreeNode::Folder {
                name,
                path,
                children: Vec::new(),
            },
            NodeKind::Note => TreeNode::Note { name, path },
            NodeKind::Asset => TreeNode::Asset { name, path },
            NodeKind::Pdf => TreeNode::Pdf { name, path },
            NodeKind::Csv => TreeNode::Csv { name, path },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TreeNode::Folder { .. } => NodeKind::Folder,
            TreeNode::Note { .. } => NodeKind::Note,
            TreeNode::Asset { .. } => NodeKind::Asset,
            TreeNode::Pdf { .. } => NodeKind::Pdf,
            TreeNode::Csv { .. } => NodeKind::Csv,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder { name, .. }
            | TreeNode::Note { name, .. }
            | TreeNode::Asset { name, .. }
            | TreeNode::Pdf { name, .. }
            | TreeNode::Csv { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeNode::Folder { path, .. }
            | TreeNode::Note { path, .. }
            | TreeNode::Asset { path, .. }
            | TreeNode::Pdf { path, .. }
            | TreeNode::Csv { path, .. } => path,
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Folder { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first lookup by path.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path() == path {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(path))
    }
}
