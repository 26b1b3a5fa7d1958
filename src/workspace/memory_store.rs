//! In-memory [`ContentStore`] for controller tests, with failure injection.

use std::cell::{Cell, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use indexmap::IndexMap;

use crate::io::store::{
    ContentStore, NoteContent, SettingsListing, StoreError, TaskListing,
};
use crate::model::{
    NodeKind, NoteRef, SearchMatch, Settings, SettingsPatch, TagGroup, TaskDraft, TaskRecord,
    TreeNode, is_note_file,
};
use crate::ops::tags::tag_occurrences;
use crate::util::path::{file_name, parent};

#[derive(Default)]
pub struct MemoryStore {
    notes: RefCell<BTreeMap<String, String>>,
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    folders: RefCell<BTreeSet<String>>,
    tasks: RefCell<Vec<TaskRecord>>,
    settings: RefCell<Settings>,
    fail: RefCell<Option<String>>,
    notices: RefCell<Vec<String>>,
    last_patch: RefCell<Option<SettingsPatch>>,
    next_id: Cell<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_note(self, path: &str, content: &str) -> Self {
        self.add_parents(path);
        self.notes
            .borrow_mut()
            .insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_file(self, path: &str, bytes: &[u8]) -> Self {
        self.add_parents(path);
        self.files.borrow_mut().insert(path.to_string(), bytes.to_vec());
        self
    }

    pub fn with_folder(self, path: &str) -> Self {
        self.add_parents(path);
        self.folders.borrow_mut().insert(path.to_string());
        self
    }

    pub fn settings_mut(&self) -> RefMut<'_, Settings> {
        self.settings.borrow_mut()
    }

    /// Make the next store call fail with `message`.
    pub fn fail_next(&self, message: &str) {
        *self.fail.borrow_mut() = Some(message.to_string());
    }

    /// Returned once by the next `get_tasks`.
    pub fn push_notice(&self, notice: &str) {
        self.notices.borrow_mut().push(notice.to_string());
    }

    pub fn note(&self, path: &str) -> Option<String> {
        self.notes.borrow().get(path).cloned()
    }

    pub fn last_settings_patch(&self) -> Option<SettingsPatch> {
        self.last_patch.borrow().clone()
    }

    fn add_parents(&self, path: &str) {
        let mut dir = parent(path);
        while !dir.is_empty() {
            self.folders.borrow_mut().insert(dir.to_string());
            dir = parent(dir);
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.fail.borrow_mut().take() {
            Some(message) => Err(StoreError::Message(message)),
            None => Ok(()),
        }
    }

    fn children(&self, dir: &str, show_templates: bool) -> Vec<TreeNode> {
        let mut nodes = Vec::new();
        for folder in self.folders.borrow().iter() {
            if parent(folder) == dir && !folder.is_empty() {
                nodes.push(TreeNode::folder(
                    file_name(folder),
                    folder.clone(),
                    self.children(folder, show_templates),
                ));
            }
        }
        let notes = self.notes.borrow();
        let files = self.files.borrow();
        for path in notes.keys().chain(files.keys()) {
            if parent(path) != dir {
                continue;
            }
            if let Some(kind) = NodeKind::classify_file(file_name(path), show_templates) {
                nodes.push(TreeNode::leaf(kind, file_name(path), path.clone()));
            }
        }
        nodes.sort_by_key(|n| (n.kind().rank(), n.name().to_lowercase()));
        nodes
    }

    fn task_mut<T>(&self, id: &str, f: impl FnOnce(&mut TaskRecord) -> T) -> Result<T, StoreError> {
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound("task not found".into()))?;
        Ok(f(task))
    }
}

impl ContentStore for MemoryStore {
    fn get_tree(&self, prefix: Option<&str>) -> Result<TreeNode, StoreError> {
        self.check()?;
        let prefix = prefix.unwrap_or_default();
        let show_templates = self.settings.borrow().show_templates;
        Ok(TreeNode::folder(
            "Notes",
            prefix,
            self.children(prefix, show_templates),
        ))
    }

    fn get_tags(&self) -> Result<Vec<TagGroup>, StoreError> {
        self.check()?;
        let mut groups: IndexMap<String, Vec<NoteRef>> = IndexMap::new();
        for (path, text) in self.notes.borrow().iter() {
            for tag in tag_occurrences(text) {
                let notes = groups.entry(tag.to_string()).or_default();
                if !notes.iter().any(|n| &n.path == path) {
                    notes.push(NoteRef {
                        path: path.clone(),
                        name: file_name(path).to_string(),
                    });
                }
            }
        }
        groups.sort_by(|a, _, b, _| a.to_lowercase().cmp(&b.to_lowercase()));
        Ok(groups
            .into_iter()
            .map(|(tag, notes)| TagGroup { tag, notes })
            .collect())
    }

    fn get_tasks(&self) -> Result<TaskListing, StoreError> {
        self.check()?;
        Ok(TaskListing {
            tasks: self.tasks.borrow().clone(),
            notice: self.notices.borrow_mut().pop(),
        })
    }

    fn get_settings(&self) -> Result<SettingsListing, StoreError> {
        self.check()?;
        Ok(SettingsListing {
            settings: self.settings.borrow().clone(),
            notice: None,
        })
    }

    fn get_note(&self, path: &str) -> Result<NoteContent, StoreError> {
        self.check()?;
        let content = self
            .note(path)
            .ok_or_else(|| StoreError::NotFound("note not found".into()))?;
        Ok(NoteContent {
            path: path.to_string(),
            content,
            modified: Utc::now(),
        })
    }

    fn create_note(&self, path: &str, content: &str) -> Result<String, StoreError> {
        self.check()?;
        let path = if is_note_file(path) {
            path.to_string()
        } else {
            format!("{}.md", path)
        };
        if self.notes.borrow().contains_key(&path) {
            return Err(StoreError::Conflict("note already exists".into()));
        }
        self.add_parents(&path);
        self.notes.borrow_mut().insert(path.clone(), content.to_string());
        Ok(path)
    }

    fn update_note(&self, path: &str, content: &str) -> Result<String, StoreError> {
        self.check()?;
        let mut notes = self.notes.borrow_mut();
        let text = notes
            .get_mut(path)
            .ok_or_else(|| StoreError::NotFound("note not found".into()))?;
        *text = content.to_string();
        Ok(path.to_string())
    }

    fn delete_note(&self, path: &str) -> Result<(), StoreError> {
        self.check()?;
        self.notes
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound("note not found".into()))
    }

    fn rename_note(&self, path: &str, new_path: &str) -> Result<String, StoreError> {
        self.check()?;
        let new_path = if is_note_file(new_path) {
            new_path.to_string()
        } else {
            format!("{}.md", new_path)
        };
        if self.notes.borrow().contains_key(&new_path) {
            return Err(StoreError::Conflict("destination already exists".into()));
        }
        let content = self
            .notes
            .borrow_mut()
            .remove(path)
            .ok_or_else(|| StoreError::NotFound("note not found".into()))?;
        self.notes.borrow_mut().insert(new_path.clone(), content);
        Ok(new_path)
    }

    fn create_folder(&self, path: &str) -> Result<String, StoreError> {
        self.check()?;
        if !self.folders.borrow_mut().insert(path.to_string()) {
            return Err(StoreError::Conflict("folder already exists".into()));
        }
        self.add_parents(path);
        Ok(path.to_string())
    }

    fn rename_folder(&self, path: &str, new_path: &str) -> Result<String, StoreError> {
        self.check()?;
        if !self.folders.borrow().contains(path) {
            return Err(StoreError::NotFound("folder not found".into()));
        }
        let moved = |p: &str| -> Option<String> {
            let rest = p.strip_prefix(path)?;
            (rest.is_empty() || rest.starts_with('/')).then(|| format!("{}{}", new_path, rest))
        };
        let folders: BTreeSet<String> = self
            .folders
            .borrow()
            .iter()
            .map(|f| moved(f).unwrap_or_else(|| f.clone()))
            .collect();
        *self.folders.borrow_mut() = folders;
        let notes: BTreeMap<String, String> = std::mem::take(&mut *self.notes.borrow_mut())
            .into_iter()
            .map(|(p, c)| (moved(&p).unwrap_or(p), c))
            .collect();
        *self.notes.borrow_mut() = notes;
        Ok(new_path.to_string())
    }

    fn delete_folder(&self, path: &str) -> Result<(), StoreError> {
        self.check()?;
        if !self.folders.borrow_mut().remove(path) {
            return Err(StoreError::NotFound("folder not found".into()));
        }
        let inside = |p: &String| p.starts_with(&format!("{}/", path));
        self.folders.borrow_mut().retain(|f| !inside(f));
        self.notes.borrow_mut().retain(|p, _| !inside(p));
        self.files.borrow_mut().retain(|p, _| !inside(p));
        Ok(())
    }

    fn get_task(&self, id: &str) -> Result<TaskRecord, StoreError> {
        self.check()?;
        self.task_mut(id, |t| t.clone())
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<TaskRecord, StoreError> {
        self.check()?;
        let valid = draft.validate()?;
        self.next_id.set(self.next_id.get() + 1);
        let now = Utc::now();
        let task = TaskRecord {
            id: format!("task-{}", self.next_id.get()),
            title: valid.title,
            project: valid.project,
            tags: valid.tags,
            created: now,
            updated: now,
            due_date: valid.due_date,
            priority: valid.priority,
            completed: valid.completed,
            notes: valid.notes,
            source: None,
        };
        self.tasks.borrow_mut().push(task.clone());
        Ok(task)
    }

    fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<TaskRecord, StoreError> {
        self.check()?;
        let valid = draft.validate()?;
        self.task_mut(id, |task| {
            task.title = valid.title;
            task.project = valid.project;
            task.tags = valid.tags;
            task.due_date = valid.due_date;
            task.priority = valid.priority;
            task.completed = valid.completed;
            task.notes = valid.notes;
            task.updated = Utc::now();
            task.clone()
        })
    }

    fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(StoreError::NotFound("task not found".into()));
        }
        Ok(())
    }

    fn update_settings(&self, patch: &SettingsPatch) -> Result<Settings, StoreError> {
        self.check()?;
        let patch = patch.clone().validated()?;
        self.settings.borrow_mut().apply(&patch);
        *self.last_patch.borrow_mut() = Some(patch);
        Ok(self.settings.borrow().clone())
    }

    fn search(&self, query: &str) -> Result<Vec<SearchMatch>, StoreError> {
        self.check()?;
        if query.is_empty() {
            return Err(StoreError::Invalid("query is required".into()));
        }
        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        for (path, text) in self.notes.borrow().iter() {
            let name = file_name(path);
            if name.to_lowercase().contains(&needle) || text.to_lowercase().contains(&needle) {
                matches.push(SearchMatch::Note {
                    path: path.clone(),
                    name: name.to_string(),
                });
            }
        }
        for task in self.tasks.borrow().iter() {
            if task.title.to_lowercase().contains(&needle) {
                matches.push(SearchMatch::Task {
                    id: task.id.clone(),
                    name: task.title.clone(),
                });
            }
        }
        Ok(matches)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.check()?;
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("file not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_lists_folders_first() {
        let store = MemoryStore::new()
            .with_note("b.md", "")
            .with_file("a.png", b"")
            .with_note("work/x.md", "");
        let tree = store.get_tree(None).unwrap();
        let names: Vec<&str> = tree.children().iter().map(TreeNode::name).collect();
        assert_eq!(names, vec!["work", "b.md", "a.png"]);
    }

    #[test]
    fn injected_failure_hits_one_call() {
        let store = MemoryStore::new().with_note("a.md", "x");
        store.fail_next("boom");
        assert!(store.get_note("a.md").is_err());
        assert!(store.get_note("a.md").is_ok());
    }
}
