//! Slash-separated path helpers shared by the store and the workspace.
//!
//! Paths are always relative to the notes directory and always use `/`,
//! regardless of platform.

use crate::model::ValidationError;

/// Normalize a user-supplied relative path.
///
/// Empty input (or `.`) is the notes root and normalizes to `""`. `.` segments
/// and repeated separators are dropped, `..` pops a segment. Absolute paths and
/// paths that climb above the root are rejected.
pub fn clean_rel_path(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let unified = trimmed.replace('\\', "/");
    if unified.starts_with('/') {
        return Err(ValidationError::InvalidPath(
            "absolute paths are not allowed".into(),
        ));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ValidationError::InvalidPath(
                        "path escapes notes directory".into(),
                    ));
                }
            }
            other => segments.push(other),
        }
    }
    Ok(segments.join("/"))
}

/// Join a parent folder path and a child name (`""` parent is the root).
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Parent folder of a path (`""` for top-level entries).
pub fn parent(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Last segment of a path.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// File name without its final extension.
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

/// Validate a single new entry name typed by the user.
pub fn validate_entry_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidPath("name is required".into()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ValidationError::InvalidPath(
            "names cannot include slashes".into(),
        ));
    }
    Ok(name.to_string())
}
