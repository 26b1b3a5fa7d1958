use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::fs_store::{SETTINGS_FILE, TASKS_FILE};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// One or more content files changed on disk.
    Changed(Vec<PathBuf>),
}

/// Watches the notes directory for edits made outside the workspace.
pub struct NotesWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

/// Whether a changed path can affect the tree, tasks, tags or settings.
///
/// Anything under a hidden directory (including `.quill/`) is ignored, as
/// are editor temp files.
pub fn is_relevant(notes_dir: &Path, path: &Path) -> bool {
    let Ok(rel) = path.strip_prefix(notes_dir) else {
        return false;
    };
    let hidden = rel.components().any(|c| match c {
        Component::Normal(part) => part.to_str().is_none_or(|s| s.starts_with('.')),
        _ => false,
    });
    if hidden {
        return false;
    }
    let Some(name) = rel.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with('~') || name.ends_with(".swp") || name.ends_with(".tmp") {
        return false;
    }
    true
}

impl NotesWatcher {
    /// Start watching `notes_dir` recursively.
    /// Call [`poll`](Self::poll) each tick.
    pub fn start(notes_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let root = notes_dir.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| is_relevant(&root, p))
                    .collect();
                if !relevant.is_empty() {
                    let _ = tx.send(FileEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(notes_dir, RecursiveMode::Recursive)?;
        Ok(NotesWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending file events.
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

/// True if any changed path is the settings file.
pub fn touches_settings(notes_dir: &Path, paths: &[PathBuf]) -> bool {
    paths.iter().any(|p| p == &notes_dir.join(SETTINGS_FILE))
}

/// True if any changed path is the tasks file.
pub fn touches_tasks(notes_dir: &Path, paths: &[PathBuf]) -> bool {
    paths.iter().any(|p| p == &notes_dir.join(TASKS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevance_filter() {
        let root = Path::new("/notes");
        assert!(is_relevant(root, Path::new("/notes/a.md")));
        assert!(is_relevant(root, Path::new("/notes/work/pic.png")));
        assert!(is_relevant(root, Path::new("/notes/tasks.json")));
        assert!(!is_relevant(root, Path::new("/notes/.quill/state.json")));
        assert!(!is_relevant(root, Path::new("/notes/work/.a.md.swp")));
        assert!(!is_relevant(root, Path::new("/notes/a.md~")));
        assert!(!is_relevant(root, Path::new("/elsewhere/a.md")));
    }

    #[test]
    fn detects_special_files() {
        let root = Path::new("/notes");
        let paths = vec![PathBuf::from("/notes/settings.json")];
        assert!(touches_settings(root, &paths));
        assert!(!touches_tasks(root, &paths));
    }
}
