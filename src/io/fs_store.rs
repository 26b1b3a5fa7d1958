use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::io::store::{ContentStore, NoteContent, SettingsListing, StoreError, TaskListing};
use crate::model::{
    NodeKind, NoteRef, SearchMatch, Settings, SettingsPatch, TagGroup, TaskDraft, TaskRecord,
    TaskSource, TreeNode, is_ignored, is_markdown, is_note_file, is_template,
};
use crate::ops::note_tasks::parse_task_lines;
use crate::ops::tags::tag_occurrences;
use crate::ops::template::{FOLDER_TEMPLATE, TemplateContext, apply_placeholders};
use crate::util::path::{clean_rel_path, join};

pub const TASKS_FILE: &str = "tasks.json";
pub const SETTINGS_FILE: &str = "settings.json";
const TASKS_VERSION: u32 = 1;
/// Label of the tree root
pub const ROOT_NAME: &str = "Notes";

/// Write a file atomically: temp file in the same directory, then rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Pretty-print `value` with two-space indentation and a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut data = serde_json::to_string_pretty(value)?;
    data.push('\n');
    atomic_write(path, data.as_bytes())?;
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    tasks: Vec<TaskRecord>,
}

/// A [`ContentStore`] backed by a notes directory on disk.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    sync_note_tasks: bool,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore {
            root: root.into(),
            sync_note_tasks: false,
        }
    }

    /// Sync `* ` bullet lines into tasks whenever a note is written.
    pub fn with_note_task_sync(mut self, enabled: bool) -> Self {
        self.sync_note_tasks = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Clean a relative path and join it onto the root.
    fn resolve(&self, input: &str) -> Result<(PathBuf, String), StoreError> {
        let rel = clean_rel_path(input)?;
        let abs = if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&rel)
        };
        Ok((abs, rel))
    }

    /// Like [`resolve`](Self::resolve) but the root itself is not accepted.
    fn resolve_required(&self, input: &str) -> Result<(PathBuf, String), StoreError> {
        let (abs, rel) = self.resolve(input)?;
        if rel.is_empty() {
            return Err(StoreError::Invalid("path is required".into()));
        }
        Ok((abs, rel))
    }

    /// Resolve an existing note file.
    fn existing_note(&self, input: &str) -> Result<(PathBuf, String, fs::Metadata), StoreError> {
        let (abs, rel) = self.resolve_required(input)?;
        let meta = stat(&abs, "note not found")?;
        if meta.is_dir() {
            return Err(StoreError::Invalid("path is a folder".into()));
        }
        if !is_note_file(&rel) {
            return Err(StoreError::Invalid("not a note file".into()));
        }
        Ok((abs, rel, meta))
    }

    fn existing_folder(&self, input: &str) -> Result<(PathBuf, String), StoreError> {
        let (abs, rel) = self.resolve_required(input)?;
        let meta = stat(&abs, "folder not found")?;
        if !meta.is_dir() {
            return Err(StoreError::Invalid("path is not a folder".into()));
        }
        Ok((abs, rel))
    }

    // -----------------------------------------------------------------------
    // Tasks file
    // -----------------------------------------------------------------------

    fn tasks_path(&self) -> PathBuf {
        self.root.join(TASKS_FILE)
    }

    fn load_tasks(&self) -> Result<(TaskFile, Option<String>), StoreError> {
        let path = self.tasks_path();
        match fs::read_to_string(&path) {
            Ok(text) => {
                let mut file: TaskFile = serde_json::from_str(&text)?;
                if file.version == 0 {
                    file.version = TASKS_VERSION;
                }
                Ok((file, None))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let file = TaskFile {
                    version: TASKS_VERSION,
                    tasks: Vec::new(),
                };
                fs::create_dir_all(&self.root)?;
                write_json(&path, &file)?;
                info!(path = %path.display(), "tasks file created");
                Ok((file, Some("Created tasks.json".to_string())))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save_tasks(&self, file: &TaskFile) -> Result<(), StoreError> {
        write_json(&self.tasks_path(), file)
    }

    // -----------------------------------------------------------------------
    // Settings file
    // -----------------------------------------------------------------------

    fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    fn load_settings(&self) -> Result<(Settings, Option<String>), StoreError> {
        let path = self.settings_path();
        match fs::read_to_string(&path) {
            Ok(text) => {
                let settings: Settings = serde_json::from_str(&text)?;
                Ok((settings.normalized(), None))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let settings = Settings::default();
                fs::create_dir_all(&self.root)?;
                write_json(&path, &settings)?;
                info!(path = %path.display(), "settings created");
                Ok((settings, Some("Created settings.json".to_string())))
            }
            Err(e) => Err(e.into()),
        }
    }

    // -----------------------------------------------------------------------
    // Templates and the daily note
    // -----------------------------------------------------------------------

    fn folder_template(&self, dir: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(dir.join(FOLDER_TEMPLATE)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create today's note in the daily folder if the folder exists and the
    /// note does not.
    pub fn ensure_daily_note(&self, settings: &Settings, now: NaiveDateTime) -> Result<(), StoreError> {
        let folder = settings.daily_folder.trim();
        if folder.is_empty() {
            return Ok(());
        }
        let (dir, rel_dir) = self.resolve(folder)?;
        if !dir.is_dir() {
            return Ok(());
        }
        let file_name = format!("{}.md", now.format("%Y-%m-%d"));
        let note = dir.join(&file_name);
        if note.exists() {
            return Ok(());
        }
        let rel = join(&rel_dir, &file_name);
        let content = match self.folder_template(&dir)? {
            Some(template) => apply_placeholders(&template, now, &TemplateContext::for_path(&rel)),
            None => String::new(),
        };
        fs::write(&note, content)?;
        info!(path = %rel, "daily note created");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Walking
    // -----------------------------------------------------------------------

    fn build_tree(&self, abs: &Path, rel: &str, show_templates: bool) -> Result<Vec<TreeNode>, StoreError> {
        let mut nodes = Vec::new();
        for (name, is_dir) in sorted_entries(abs)? {
            let child_rel = join(rel, &name);
            if is_dir {
                if name.starts_with('.') {
                    continue;
                }
                let children = self.build_tree(&abs.join(&name), &child_rel, show_templates)?;
                nodes.push(TreeNode::folder(name, child_rel, children));
            } else if let Some(kind) = NodeKind::classify_file(&name, show_templates) {
                nodes.push(TreeNode::leaf(kind, name, child_rel));
            }
        }
        nodes.sort_by(|a, b| {
            a.kind()
                .rank()
                .cmp(&b.kind().rank())
                .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        });
        Ok(nodes)
    }

    /// Every markdown note under the root, in path order, skipping hidden folders.
    fn markdown_notes(&self) -> Result<Vec<(String, PathBuf)>, StoreError> {
        fn walk(abs: &Path, rel: &str, out: &mut Vec<(String, PathBuf)>) -> io::Result<()> {
            for (name, is_dir) in sorted_entries(abs)? {
                let child_rel = join(rel, &name);
                let child_abs = abs.join(&name);
                if is_dir {
                    if !name.starts_with('.') {
                        walk(&child_abs, &child_rel, out)?;
                    }
                } else if !is_ignored(&name) && is_markdown(&name) {
                    out.push((child_rel, child_abs));
                }
            }
            Ok(())
        }
        let mut out = Vec::new();
        walk(&self.root, "", &mut out)?;
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Note task sync
    // -----------------------------------------------------------------------

    fn sync_tasks_from_note(&self, note_path: &str, content: &str) -> Result<(), StoreError> {
        let lines = parse_task_lines(content);
        if lines.is_empty() {
            return Ok(());
        }
        let (mut file, _) = self.load_tasks()?;

        let mut by_line: HashMap<usize, usize> = HashMap::new();
        let mut by_hash: HashMap<String, usize> = HashMap::new();
        for (idx, task) in file.tasks.iter().enumerate() {
            let Some(source) = task.source.as_ref().filter(|s| s.note_path == note_path) else {
                continue;
            };
            if source.line_number > 0 {
                by_line.insert(source.line_number, idx);
            }
            if !source.line_hash.is_empty() {
                by_hash.insert(source.line_hash.clone(), idx);
            }
        }

        let now = Utc::now();
        let mut used = vec![false; file.tasks.len()];
        let (mut updated, mut created) = (0, 0);
        for line in lines {
            let source = TaskSource {
                note_path: note_path.to_string(),
                line_number: line.line_number,
                line_hash: line.line_hash.clone(),
            };
            let matched = by_line
                .get(&line.line_number)
                .copied()
                .filter(|&i| !used[i])
                .or_else(|| by_hash.get(&line.line_hash).copied().filter(|&i| !used[i]));

            match matched {
                Some(idx) => {
                    let task = &mut file.tasks[idx];
                    task.title = line.title;
                    task.project = line.project;
                    task.tags = line.tags;
                    task.due_date = line.due_date;
                    task.priority = line.priority;
                    task.updated = now;
                    task.source = Some(source);
                    used[idx] = true;
                    updated += 1;
                }
                None => {
                    file.tasks.push(TaskRecord {
                        id: new_task_id(),
                        title: line.title,
                        project: line.project,
                        tags: line.tags,
                        created: now,
                        updated: now,
                        due_date: line.due_date,
                        priority: line.priority,
                        completed: false,
                        notes: String::new(),
                        source: Some(source),
                    });
                    used.push(true);
                    created += 1;
                }
            }
        }
        self.save_tasks(&file)?;
        debug!(path = note_path, updated, created, "note tasks synced");
        Ok(())
    }

    fn after_note_write(&self, rel: &str, content: &str) -> Result<(), StoreError> {
        if self.sync_note_tasks {
            self.sync_tasks_from_note(rel, content)?;
        }
        Ok(())
    }
}

fn stat(path: &Path, missing: &str) -> Result<fs::Metadata, StoreError> {
    fs::metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(missing.to_string())
        } else {
            StoreError::Io(e)
        }
    })
}

fn ensure_absent(path: &Path, conflict: &str) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(_) => Err(StoreError::Conflict(conflict.to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Directory entries as `(name, is_dir)`, sorted by name.
fn sorted_entries(dir: &Path) -> io::Result<Vec<(String, bool)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_dir = entry.file_type()?.is_dir();
        entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
    }
    entries.sort();
    Ok(entries)
}

/// Append `.md` unless the path already names a note or template.
fn with_note_extension(path: &str, template: bool) -> String {
    let path = path.trim();
    if template {
        if is_template(path) {
            path.to_string()
        } else {
            format!("{}.template", path)
        }
    } else if is_markdown(path) {
        path.to_string()
    } else {
        format!("{}.md", path)
    }
}

fn new_task_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn required(input: &str, what: &str) -> Result<(), StoreError> {
    if input.trim().is_empty() {
        Err(StoreError::Invalid(format!("{} is required", what)))
    } else {
        Ok(())
    }
}

fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

impl ContentStore for FsStore {
    fn get_tree(&self, prefix: Option<&str>) -> Result<TreeNode, StoreError> {
        let (settings, _) = self.load_settings()?;
        self.ensure_daily_note(&settings, now_local())?;
        let (abs, rel) = self.resolve(prefix.unwrap_or_default())?;
        let meta = stat(&abs, "path not found")?;
        if !meta.is_dir() {
            return Err(StoreError::Invalid("path must be a folder".into()));
        }
        let children = self.build_tree(&abs, &rel, settings.show_templates)?;
        Ok(TreeNode::folder(ROOT_NAME, rel, children))
    }

    fn get_tags(&self) -> Result<Vec<TagGroup>, StoreError> {
        // tag -> (path -> name); BTreeMap keeps paths ordered for the tie-break
        let mut tags: HashMap<String, BTreeMap<String, String>> = HashMap::new();
        for (rel, abs) in self.markdown_notes()? {
            let Ok(text) = fs::read_to_string(&abs) else {
                continue;
            };
            let name = crate::util::path::file_name(&rel).to_string();
            for tag in all_tag_spellings(&text) {
                tags.entry(tag)
                    .or_default()
                    .insert(rel.clone(), name.clone());
            }
        }

        let mut groups: Vec<TagGroup> = tags
            .into_iter()
            .map(|(tag, notes)| {
                let mut notes: Vec<NoteRef> = notes
                    .into_iter()
                    .map(|(path, name)| NoteRef { path, name })
                    .collect();
                notes.sort_by(|a, b| {
                    a.name
                        .to_lowercase()
                        .cmp(&b.name.to_lowercase())
                        .then_with(|| a.path.cmp(&b.path))
                });
                TagGroup { tag, notes }
            })
            .collect();
        groups.sort_by(|a, b| {
            a.tag
                .to_lowercase()
                .cmp(&b.tag.to_lowercase())
                .then_with(|| a.tag.cmp(&b.tag))
        });
        Ok(groups)
    }

    fn get_tasks(&self) -> Result<TaskListing, StoreError> {
        let (file, notice) = self.load_tasks()?;
        Ok(TaskListing {
            tasks: file.tasks,
            notice,
        })
    }

    fn get_settings(&self) -> Result<SettingsListing, StoreError> {
        let (settings, notice) = self.load_settings()?;
        Ok(SettingsListing { settings, notice })
    }

    fn get_note(&self, path: &str) -> Result<NoteContent, StoreError> {
        required(path, "path")?;
        let (abs, rel, meta) = self.existing_note(path)?;
        let content = fs::read_to_string(&abs)?;
        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        Ok(NoteContent {
            path: rel,
            content,
            modified,
        })
    }

    fn create_note(&self, path: &str, content: &str) -> Result<String, StoreError> {
        required(path, "path")?;
        let target = with_note_extension(path, is_template(path.trim()));
        let (abs, rel) = self.resolve_required(&target)?;
        ensure_absent(&abs, "note already exists")?;
        let dir = abs.parent().unwrap_or(&self.root).to_path_buf();
        fs::create_dir_all(&dir)?;

        let template = self.folder_template(&dir)?;
        let used_template = template.is_some();
        let content = match template {
            Some(template) => {
                apply_placeholders(&template, now_local(), &TemplateContext::for_path(&rel))
            }
            None => content.to_string(),
        };
        fs::write(&abs, &content)?;
        self.after_note_write(&rel, &content)?;
        info!(path = %rel, bytes = content.len(), template = used_template, "note created");
        Ok(rel)
    }

    fn update_note(&self, path: &str, content: &str) -> Result<String, StoreError> {
        required(path, "path")?;
        let (abs, rel, _) = self.existing_note(path)?;
        fs::write(&abs, content)?;
        self.after_note_write(&rel, content)?;
        info!(path = %rel, bytes = content.len(), "note updated");
        Ok(rel)
    }

    fn delete_note(&self, path: &str) -> Result<(), StoreError> {
        required(path, "path")?;
        let (abs, rel, _) = self.existing_note(path)?;
        fs::remove_file(&abs)?;
        info!(path = %rel, "note deleted");
        Ok(())
    }

    fn rename_note(&self, path: &str, new_path: &str) -> Result<String, StoreError> {
        if path.trim().is_empty() || new_path.trim().is_empty() {
            return Err(StoreError::Invalid("path and newPath are required".into()));
        }
        let (abs, rel, _) = self.existing_note(path)?;
        let target = with_note_extension(new_path, is_template(&rel));
        let (new_abs, new_rel) = self.resolve_required(&target)?;
        ensure_absent(&new_abs, "destination already exists")?;
        if let Some(dir) = new_abs.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::rename(&abs, &new_abs)?;
        info!(path = %rel, new_path = %new_rel, "note renamed");
        Ok(new_rel)
    }

    fn create_folder(&self, path: &str) -> Result<String, StoreError> {
        required(path, "path")?;
        let (abs, rel) = self.resolve_required(path)?;
        ensure_absent(&abs, "folder already exists")?;
        fs::create_dir_all(&abs)?;
        info!(path = %rel, "folder created");
        Ok(rel)
    }

    fn rename_folder(&self, path: &str, new_path: &str) -> Result<String, StoreError> {
        if path.trim().is_empty() || new_path.trim().is_empty() {
            return Err(StoreError::Invalid("path and newPath are required".into()));
        }
        let (new_abs, new_rel) = self.resolve_required(new_path)?;
        let (abs, rel) = self.existing_folder(path)?;
        if new_rel == rel || new_rel.starts_with(&format!("{}/", rel)) {
            return Err(StoreError::Invalid("cannot move a folder into itself".into()));
        }
        ensure_absent(&new_abs, "destination already exists")?;
        if let Some(dir) = new_abs.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::rename(&abs, &new_abs)?;
        info!(path = %rel, new_path = %new_rel, "folder renamed");
        Ok(new_rel)
    }

    fn delete_folder(&self, path: &str) -> Result<(), StoreError> {
        required(path, "path")?;
        let (abs, rel) = self.existing_folder(path)?;
        fs::remove_dir_all(&abs)?;
        info!(path = %rel, "folder deleted");
        Ok(())
    }

    fn get_task(&self, id: &str) -> Result<TaskRecord, StoreError> {
        required(id, "task id")?;
        let (file, _) = self.load_tasks()?;
        file.tasks
            .into_iter()
            .find(|t| t.id == id.trim())
            .ok_or_else(|| StoreError::NotFound("task not found".into()))
    }

    fn create_task(&self, draft: &TaskDraft) -> Result<TaskRecord, StoreError> {
        let valid = draft.validate()?;
        let (mut file, _) = self.load_tasks()?;
        let now = Utc::now();
        let task = TaskRecord {
            id: new_task_id(),
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
        file.tasks.push(task.clone());
        self.save_tasks(&file)?;
        info!(id = %task.id, "task created");
        Ok(task)
    }

    fn update_task(&self, id: &str, draft: &TaskDraft) -> Result<TaskRecord, StoreError> {
        required(id, "task id")?;
        let valid = draft.validate()?;
        let (mut file, _) = self.load_tasks()?;
        let task = file
            .tasks
            .iter_mut()
            .find(|t| t.id == id.trim())
            .ok_or_else(|| StoreError::NotFound("task not found".into()))?;
        task.title = valid.title;
        task.project = valid.project;
        task.tags = valid.tags;
        task.due_date = valid.due_date;
        task.priority = valid.priority;
        task.completed = valid.completed;
        task.notes = valid.notes;
        task.updated = Utc::now();
        let updated = task.clone();
        self.save_tasks(&file)?;
        info!(id = %updated.id, "task updated");
        Ok(updated)
    }

    fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        required(id, "task id")?;
        let (mut file, _) = self.load_tasks()?;
        let before = file.tasks.len();
        file.tasks.retain(|t| t.id != id.trim());
        if file.tasks.len() == before {
            return Err(StoreError::NotFound("task not found".into()));
        }
        self.save_tasks(&file)?;
        info!(id = id.trim(), "task deleted");
        Ok(())
    }

    fn update_settings(&self, patch: &SettingsPatch) -> Result<Settings, StoreError> {
        let patch = patch.clone().validated()?;
        let (mut settings, _) = self.load_settings()?;
        let changed = settings.apply(&patch);
        write_json(&self.settings_path(), &settings)?;
        info!(fields = %changed.join(","), "settings updated");
        Ok(settings)
    }

    fn search(&self, query: &str) -> Result<Vec<SearchMatch>, StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StoreError::Invalid("query is required".into()));
        }
        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        for (rel, abs) in self.markdown_notes()? {
            let name = crate::util::path::file_name(&rel).to_string();
            let hit = name.to_lowercase().contains(&needle)
                || fs::read_to_string(&abs)
                    .map(|text| text.to_lowercase().contains(&needle))
                    .unwrap_or(false);
            if hit {
                matches.push(SearchMatch::Note { path: rel, name });
            }
        }

        let (file, _) = self.load_tasks()?;
        for task in file.tasks {
            let hit = task.title.to_lowercase().contains(&needle)
                || task.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if hit {
                matches.push(SearchMatch::Task {
                    id: task.id,
                    name: task.title,
                });
            }
        }
        Ok(matches)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        required(path, "path")?;
        let (abs, _) = self.resolve_required(path)?;
        let meta = stat(&abs, "file not found")?;
        if meta.is_dir() {
            return Err(StoreError::Invalid("path is a folder".into()));
        }
        Ok(fs::read(&abs)?)
    }
}

/// Every distinct tag spelling in the text. Differing casings stay separate
/// so the index groups by exact tag string.
fn all_tag_spellings(text: &str) -> Vec<String> {
    let spellings: IndexSet<&str> = tag_occurrences(text).collect();
    spellings.into_iter().map(str::to_string).collect()
}
