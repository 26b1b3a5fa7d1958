use std::time::Instant;

use tracing::{debug, info, warn};

use crate::io::store::{ContentStore, StoreError};
use crate::model::{
    EntityRef, Layout, NodeKind, SearchMatch, Settings, TaskDraft, TaskRecord, is_note_file,
};
use crate::ops::index::{ContentIndex, GroupRef, IndexNode};
use crate::util::path::{file_name, join, parent, validate_entry_name};

use super::autosave::AutosaveScheduler;
use super::scroll_sync::{Pane, ScrollMetrics, ScrollSync};
use super::state::{
    AssetView, Completion, Mode, SaveOutcome, SavePayload, SaveRequest, SaveTicket, Snapshot,
    Surface, TaskView, WorkspaceState,
};
use super::WorkspaceError;

/// Owns the workspace state and is the only thing that changes it.
///
/// Store calls are synchronous. Saves are split into
/// [`begin_save`](Self::begin_save), [`run_save`](Self::run_save) and
/// [`complete_save`](Self::complete_save) so a caller can finish them later;
/// [`save_current`](Self::save_current) runs all three.
pub struct ModeController<S: ContentStore> {
    store: S,
    state: WorkspaceState,
    autosave: AutosaveScheduler,
    scroll: ScrollSync,
    notices: Vec<String>,
}

impl<S: ContentStore> ModeController<S> {
    pub fn new(store: S) -> Self {
        ModeController {
            store,
            state: WorkspaceState::default(),
            autosave: AutosaveScheduler::new(),
            scroll: ScrollSync::new(),
            notices: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn surface(&self) -> &Surface {
        self.state.surface()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    pub fn save_enabled(&self) -> bool {
        self.state.save_enabled()
    }

    pub fn index(&self) -> &ContentIndex {
        self.state.index()
    }

    pub fn note_tags(&self) -> &[String] {
        self.state.note_tags()
    }

    pub fn settings(&self) -> &Settings {
        self.state.settings()
    }

    pub fn autosave(&self) -> &AutosaveScheduler {
        &self.autosave
    }

    /// Notices from the store ("Created tasks.json") since the last call.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Run a mode transition. Scroll coupling belongs to the old surface
    /// and is reset.
    fn switch(&mut self, transition: impl FnOnce(WorkspaceState) -> WorkspaceState) {
        let from = self.state.mode();
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
        self.scroll.reset();
        debug!(from = from.as_str(), to = self.state.mode().as_str(), "mode switch");
    }

    fn replace(&mut self, update: impl FnOnce(WorkspaceState) -> WorkspaceState) {
        let state = std::mem::take(&mut self.state);
        self.state = update(state);
    }

    /// The configured default folder if it is in the index, else the root.
    fn home_group(&self) -> Option<GroupRef> {
        let folder = GroupRef::Folder(self.state.settings().default_folder.clone());
        if self.state.index().resolve(&folder).is_some() {
            return Some(folder);
        }
        self.state.index().files().and_then(IndexNode::group_ref)
    }

    fn reset_to_home(&mut self) {
        let group = self.home_group();
        self.switch(|s| s.enter_summary(group));
    }

    fn apply_settings(&mut self, settings: Settings, now: Instant) {
        self.autosave
            .configure(settings.autosave_enabled, settings.autosave_interval(), now);
        self.replace(|s| s.with_settings(settings));
    }

    /// Restore a note layout persisted from an earlier session.
    pub fn restore_note_layout(&mut self, layout: Option<Layout>) {
        self.replace(|s| s.with_note_layout(layout));
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    fn fetch_snapshot(&mut self) -> Result<Snapshot, StoreError> {
        let tree = self.store.get_tree(None)?;
        let listing = self.store.get_tasks()?;
        let tags = self.store.get_tags()?;
        if let Some(notice) = listing.notice {
            self.notices.push(notice);
        }
        Ok(Snapshot::new(Some(tree), listing.tasks, tags))
    }

    fn fetch_settings(&mut self) -> Result<Settings, StoreError> {
        let listing = self.store.get_settings()?;
        if let Some(notice) = listing.notice {
            self.notices.push(notice);
        }
        Ok(listing.settings)
    }

    pub fn load_workspace(&mut self) -> Result<(), WorkspaceError> {
        self.load_workspace_at(Instant::now())
    }

    /// Load settings, tree, tasks and tags, then show the summary for the
    /// default folder. On failure the previous snapshot stays.
    pub fn load_workspace_at(&mut self, now: Instant) -> Result<(), WorkspaceError> {
        let loaded = self
            .fetch_settings()
            .and_then(|settings| Ok((settings, self.fetch_snapshot()?)));
        let result = match loaded {
            Ok((settings, snapshot)) => {
                self.apply_settings(settings, now);
                self.replace(|s| s.with_snapshot(snapshot));
                info!(
                    tasks = self.state.snapshot().tasks.len(),
                    tags = self.state.snapshot().tags.len(),
                    "workspace loaded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "workspace load failed");
                Err(e.into())
            }
        };
        self.reset_to_home();
        result
    }

    /// Refetch tree, tasks and tags and replace the index wholesale.
    ///
    /// An open entity that disappeared is closed unless it has unsaved edits.
    pub fn reload_index(&mut self) -> Result<(), WorkspaceError> {
        let snapshot = self.fetch_snapshot().inspect_err(|e| {
            warn!(error = %e, "index reload failed");
        })?;
        self.replace(|s| s.with_snapshot(snapshot));
        debug!("index reloaded");

        if !self.state.is_dirty()
            && let Some(entity) = self.state.open_entity()
            && !self.entity_exists(&entity)
        {
            info!(entity = %entity, "open entity vanished");
            self.reset_to_home();
        }
        Ok(())
    }

    pub fn reload_settings(&mut self) -> Result<(), WorkspaceError> {
        self.reload_settings_at(Instant::now())
    }

    /// Pick up settings changed outside the workspace. An open settings
    /// form keeps its draft.
    pub fn reload_settings_at(&mut self, now: Instant) -> Result<(), WorkspaceError> {
        let settings = self.fetch_settings()?;
        if &settings == self.state.settings() {
            return Ok(());
        }
        let templates_changed = settings.show_templates != self.state.settings().show_templates;
        info!("settings changed on disk");
        self.apply_settings(settings, now);
        if templates_changed {
            self.refresh_index();
        }
        Ok(())
    }

    /// Reload after a successful write. Failures are logged and the old
    /// snapshot kept; the write itself already succeeded.
    fn refresh_index(&mut self) {
        if let Ok(snapshot) = self.fetch_snapshot().inspect_err(|e| {
            warn!(error = %e, "index refresh failed");
        }) {
            self.replace(|s| s.with_snapshot(snapshot));
        }
    }

    fn entity_exists(&self, entity: &EntityRef) -> bool {
        let snapshot = self.state.snapshot();
        match entity {
            EntityRef::Path(path) => snapshot
                .tree
                .as_ref()
                .is_some_and(|tree| tree.find(path).is_some()),
            EntityRef::Task(id) => snapshot.tasks.iter().any(|t| &t.id == id),
        }
    }

    // -----------------------------------------------------------------------
    // Opening
    // -----------------------------------------------------------------------

    /// Report a failed open. Not-found falls back to the summary view.
    fn open_failed(&mut self, err: StoreError) -> WorkspaceError {
        warn!(error = %err, "open failed");
        if err.is_not_found() {
            self.reset_to_home();
        }
        err.into()
    }

    pub fn open_note(&mut self, path: &str) -> Result<(), WorkspaceError> {
        match self.store.get_note(path) {
            Ok(note) => {
                self.switch(|s| s.enter_note(note.path, note.content));
                Ok(())
            }
            Err(e) => Err(self.open_failed(e)),
        }
    }

    pub fn open_task(&mut self, id: &str) -> Result<(), WorkspaceError> {
        match self.store.get_task(id) {
            Ok(record) => {
                let view = TaskView {
                    id: Some(record.id.clone()),
                    draft: TaskDraft::from(&record),
                };
                self.switch(|s| s.enter(Surface::Task(view)));
                Ok(())
            }
            Err(e) => Err(self.open_failed(e)),
        }
    }

    /// Open a blank task form, prefilled with `project`.
    pub fn new_task(&mut self, project: Option<&str>) {
        let view = TaskView {
            id: None,
            draft: TaskDraft::for_project(project),
        };
        self.switch(|s| s.enter(Surface::Task(view)));
    }

    pub fn open_asset(&mut self, path: &str) -> Result<(), WorkspaceError> {
        let kind = self
            .state
            .snapshot()
            .tree
            .as_ref()
            .and_then(|tree| tree.find(path))
            .map(|node| node.kind())
            .or_else(|| NodeKind::classify_file(file_name(path), true))
            .unwrap_or(NodeKind::Asset);
        match self.store.read_file(path) {
            Ok(bytes) => {
                let view = AssetView {
                    path: path.to_string(),
                    kind,
                    bytes,
                };
                self.switch(|s| s.enter(Surface::Asset(view)));
                Ok(())
            }
            Err(e) => Err(self.open_failed(e)),
        }
    }

    /// Show counts for a folder or synthetic group.
    pub fn open_group(&mut self, group: GroupRef) {
        self.switch(|s| s.enter_summary(Some(group)));
    }

    pub fn open_settings(&mut self) {
        match self.fetch_settings() {
            Ok(settings) => self.replace(|s| s.with_settings(settings)),
            Err(e) => warn!(error = %e, "settings reload failed, using cached"),
        }
        self.switch(WorkspaceState::enter_settings);
    }

    /// Open whatever an entity reference points at.
    pub fn open_entity(&mut self, entity: &EntityRef) -> Result<(), WorkspaceError> {
        let path = match entity {
            EntityRef::Task(id) => return self.open_task(id),
            EntityRef::Path(path) => path,
        };
        let kind = self
            .state
            .snapshot()
            .tree
            .as_ref()
            .and_then(|tree| tree.find(path))
            .map(|node| node.kind());
        match kind {
            Some(NodeKind::Folder) => {
                self.open_group(GroupRef::Folder(path.clone()));
                Ok(())
            }
            Some(NodeKind::Note) => self.open_note(path),
            Some(_) => self.open_asset(path),
            None if is_note_file(path) => self.open_note(path),
            None => self.open_asset(path),
        }
    }

    /// Open a sidebar node: groups show counts, leaves open their entity.
    pub fn open_node(&mut self, node: &IndexNode) -> Result<(), WorkspaceError> {
        if let Some(group) = node.group_ref() {
            self.open_group(group);
            return Ok(());
        }
        match node.entity() {
            Some(entity) => self.open_entity(&entity),
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    pub fn edit_note_text(&mut self, text: impl Into<String>) -> bool {
        self.state.set_note_text(text.into())
    }

    pub fn set_note_layout(&mut self, layout: Layout) -> bool {
        self.state.set_note_layout(layout)
    }

    pub fn edit_task(&mut self, edit: impl FnOnce(&mut TaskDraft)) -> bool {
        self.state.edit_task(edit)
    }

    pub fn edit_settings(&mut self, edit: impl FnOnce(&mut Settings)) -> bool {
        self.state.edit_settings(edit)
    }

    // -----------------------------------------------------------------------
    // Saving
    // -----------------------------------------------------------------------

    /// Validate and claim the in-flight slot for the current surface.
    pub fn begin_save(&mut self) -> Result<SaveRequest, WorkspaceError> {
        let request = self.state.begin_save().inspect_err(|e| {
            debug!(error = %e, "save not started");
        })?;
        info!(ticket = request.ticket.id, target = ?request.ticket.target, "save started");
        Ok(request)
    }

    /// Issue the store call for a request.
    pub fn run_save(&self, request: &SaveRequest) -> Result<SaveOutcome, StoreError> {
        match &request.payload {
            SavePayload::Note { path, content } => self
                .store
                .update_note(path, content)
                .map(|path| SaveOutcome::Note { path }),
            SavePayload::Task { id: Some(id), draft } => {
                self.store.update_task(id, draft).map(SaveOutcome::Task)
            }
            SavePayload::Task { id: None, draft } => {
                self.store.create_task(draft).map(SaveOutcome::Task)
            }
            SavePayload::Settings(patch) => {
                self.store.update_settings(patch).map(SaveOutcome::Settings)
            }
        }
    }

    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<SaveOutcome, StoreError>,
    ) -> Result<(), WorkspaceError> {
        self.complete_save_at(ticket, result, Instant::now())
    }

    /// Apply a save result. Results for an entity that is no longer open
    /// only refresh the index; they never touch the current surface.
    pub fn complete_save_at(
        &mut self,
        ticket: SaveTicket,
        result: Result<SaveOutcome, StoreError>,
        now: Instant,
    ) -> Result<(), WorkspaceError> {
        let unchanged = match self.state.finish_save(&ticket) {
            Completion::Ignored => {
                debug!(ticket = ticket.id, "ignoring unknown save ticket");
                return Ok(());
            }
            Completion::Stale => {
                match result {
                    Ok(SaveOutcome::Settings(settings)) => {
                        info!(ticket = ticket.id, "abandoned settings save finished");
                        self.apply_stored_settings(settings, now, |state, s| {
                            state.adopt_settings(s)
                        });
                    }
                    Ok(_) => {
                        info!(ticket = ticket.id, "abandoned save finished");
                        self.refresh_index();
                    }
                    Err(e) => warn!(ticket = ticket.id, error = %e, "abandoned save failed"),
                }
                return Ok(());
            }
            Completion::Current { unchanged } => unchanged,
        };

        let outcome = result.inspect_err(|e| {
            warn!(ticket = ticket.id, error = %e, "save failed");
        })?;
        info!(ticket = ticket.id, "save finished");

        match outcome {
            SaveOutcome::Note { .. } => {
                self.state.saved_note(unchanged);
                self.refresh_index();
            }
            SaveOutcome::Task(record) => {
                self.state.saved_task(&record, unchanged);
                self.refresh_index();
            }
            SaveOutcome::Settings(settings) => {
                self.apply_stored_settings(settings, now, |state, s| {
                    state.saved_settings(s, unchanged)
                });
            }
        }
        Ok(())
    }

    /// Cache settings returned by the store, reschedule autosave and
    /// reload the tree when template visibility flipped.
    fn apply_stored_settings(
        &mut self,
        settings: Settings,
        now: Instant,
        apply: impl FnOnce(&mut WorkspaceState, Settings),
    ) {
        let templates_changed = settings.show_templates != self.state.settings().show_templates;
        self.autosave
            .configure(settings.autosave_enabled, settings.autosave_interval(), now);
        apply(&mut self.state, settings);
        if templates_changed {
            self.refresh_index();
        }
    }

    pub fn save_current(&mut self) -> Result<(), WorkspaceError> {
        self.save_current_at(Instant::now())
    }

    pub fn save_current_at(&mut self, now: Instant) -> Result<(), WorkspaceError> {
        let request = self.begin_save()?;
        let result = self.run_save(&request);
        self.complete_save_at(request.ticket, result, now)
    }

    /// Start an autosave if one is due and allowed.
    pub fn poll_autosave(&mut self, now: Instant) -> Option<SaveRequest> {
        if !self.autosave.poll(now, self.state.autosave_ready()) {
            return None;
        }
        debug!("autosave fired");
        self.begin_save().ok()
    }

    /// Drive time-based work: ends the scroll echo window and runs a due
    /// autosave to completion.
    pub fn tick(&mut self, now: Instant) -> Option<Result<(), WorkspaceError>> {
        self.scroll.end_tick();
        let request = self.poll_autosave(now)?;
        let result = self.run_save(&request);
        Some(self.complete_save_at(request.ticket, result, now))
    }

    /// Stop autosaving. Nothing is left scheduled.
    pub fn shutdown(&mut self) {
        self.autosave.cancel();
        self.scroll.reset();
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    pub fn note_scroll_input(&mut self, pane: Pane, now: Instant) {
        self.scroll.note_input(pane, now);
    }

    /// Position for the other pane after `pane` scrolled, if it should follow.
    /// Only split note layouts are coupled.
    pub fn on_scroll(
        &mut self,
        pane: Pane,
        src: ScrollMetrics,
        dst: ScrollMetrics,
        now: Instant,
    ) -> Option<f64> {
        if self.state.surface().layout() != Some(Layout::Split) {
            return None;
        }
        self.scroll.on_scroll(pane, src, dst, now)
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Flip a task's completed flag and persist it right away.
    pub fn toggle_task_completed(&mut self, id: &str) -> Result<TaskRecord, WorkspaceError> {
        let record = self.store.get_task(id)?;
        let mut draft = TaskDraft::from(&record);
        draft.completed = !draft.completed;
        let updated = self.store.update_task(id, &draft)?;
        info!(id, completed = updated.completed, "task toggled");
        self.state.refresh_task(&updated);
        self.refresh_index();
        Ok(updated)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<(), WorkspaceError> {
        self.store.delete_task(id)?;
        info!(id, "task deleted");
        self.refresh_index();
        if self.state.open_entity() == Some(EntityRef::task(id)) {
            self.reset_to_home();
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Notes and folders
    // -----------------------------------------------------------------------

    /// Create an empty note in `folder` and open it. Returns its path.
    pub fn create_note(&mut self, folder: &str, name: &str) -> Result<String, WorkspaceError> {
        let name = validate_entry_name(name)?;
        let path = self.store.create_note(&join(folder, &name), "")?;
        info!(path = %path, "note created");
        self.refresh_index();
        self.open_note(&path)?;
        Ok(path)
    }

    pub fn create_folder(&mut self, parent_folder: &str, name: &str) -> Result<String, WorkspaceError> {
        let name = validate_entry_name(name)?;
        let path = self.store.create_folder(&join(parent_folder, &name))?;
        info!(path = %path, "folder created");
        self.refresh_index();
        self.open_group(GroupRef::Folder(path.clone()));
        Ok(path)
    }

    /// Rename a note within its folder. An open note follows the rename.
    pub fn rename_note(&mut self, path: &str, new_name: &str) -> Result<String, WorkspaceError> {
        let new_name = validate_entry_name(new_name)?;
        let renamed = self.store.rename_note(path, &join(parent(path), &new_name))?;
        info!(from = path, to = %renamed, "note renamed");
        self.state.retarget_note(path, &renamed);
        self.refresh_index();
        Ok(renamed)
    }

    pub fn rename_folder(&mut self, path: &str, new_name: &str) -> Result<String, WorkspaceError> {
        let new_name = validate_entry_name(new_name)?;
        let renamed = self
            .store
            .rename_folder(path, &join(parent(path), &new_name))?;
        info!(from = path, to = %renamed, "folder renamed");
        self.state.retarget_note(path, &renamed);
        let group = match self.state.surface() {
            Surface::Summary(view) if view.group == Some(GroupRef::Folder(path.to_string())) => {
                Some(GroupRef::Folder(renamed.clone()))
            }
            _ => None,
        };
        self.refresh_index();
        if let Some(group) = group {
            self.open_group(group);
        }
        Ok(renamed)
    }

    pub fn delete_note(&mut self, path: &str) -> Result<(), WorkspaceError> {
        self.store.delete_note(path)?;
        info!(path, "note deleted");
        self.refresh_index();
        if self.state.open_entity() == Some(EntityRef::path(path)) {
            self.reset_to_home();
        }
        Ok(())
    }

    /// Delete a folder and everything in it. Anything open inside it closes.
    pub fn delete_folder(&mut self, path: &str) -> Result<(), WorkspaceError> {
        self.store.delete_folder(path)?;
        info!(path, "folder deleted");
        self.refresh_index();
        let open_inside = self
            .state
            .open_entity()
            .is_some_and(|entity| entity.is_within(path));
        let showing = matches!(
            self.state.surface(),
            Surface::Summary(view)
                if matches!(&view.group, Some(GroupRef::Folder(f)) if EntityRef::path(f).is_within(path))
        );
        if open_inside || showing {
            self.reset_to_home();
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    pub fn search(&self, query: &str) -> Result<Vec<SearchMatch>, WorkspaceError> {
        let matches = self.store.search(query.trim())?;
        debug!(query, count = matches.len(), "search");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::SettingsPatch;
    use crate::ops::index::{FileCounts, Summary};
    use crate::workspace::memory_store::MemoryStore;

    fn controller() -> ModeController<MemoryStore> {
        let store = MemoryStore::new()
            .with_note("work/plan.md", "#Plan the #plan")
            .with_note("work/log.md", "")
            .with_note("inbox.md", "hello")
            .with_file("pic.png", b"PNG")
            .with_folder("work/empty");
        let mut ctl = ModeController::new(store);
        ctl.load_workspace().unwrap();
        ctl
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn load_lands_in_root_summary() {
        let ctl = controller();
        assert_eq!(ctl.mode(), Mode::Summary);
        assert!(!ctl.save_enabled());
        let Surface::Summary(view) = ctl.surface() else {
            panic!("expected summary");
        };
        assert_eq!(view.group, Some(GroupRef::Folder(String::new())));
        assert_eq!(ctl.index().sections.len(), 3);
    }

    #[test]
    fn load_uses_default_folder() {
        let store = MemoryStore::new()
            .with_note("work/a.md", "")
            .with_note("work/b.md", "")
            .with_file("work/c.png", b"")
            .with_folder("work/sub")
            .with_note("other.md", "");
        store.settings_mut().default_folder = "work".into();
        let mut ctl = ModeController::new(store);
        ctl.load_workspace().unwrap();

        let Surface::Summary(view) = ctl.surface() else {
            panic!("expected summary");
        };
        assert_eq!(view.group, Some(GroupRef::Folder("work".into())));
        assert_eq!(
            view.counts,
            Some(Summary::Files(FileCounts {
                folders: 1,
                notes: 2,
                assets: 1,
                pdfs: 0,
                csvs: 0,
            }))
        );
    }

    #[test]
    fn load_failure_keeps_previous_snapshot() {
        let mut ctl = controller();
        let before = ctl.index().clone();
        ctl.store().fail_next("store offline");
        let err = ctl.load_workspace().unwrap_err();
        assert_eq!(err.to_string(), "store offline");
        assert_eq!(ctl.index(), &before);
        assert_eq!(ctl.mode(), Mode::Summary);
    }

    #[test]
    fn exactly_one_mode_after_each_open() {
        let mut ctl = controller();
        ctl.new_task(None);
        let task = {
            ctl.edit_task(|d| d.title = "Call".into());
            ctl.save_current().unwrap();
            ctl.state().open_entity().unwrap()
        };

        let steps: Vec<(Mode, bool)> = vec![
            {
                ctl.open_note("inbox.md").unwrap();
                (ctl.mode(), ctl.save_enabled())
            },
            {
                ctl.open_entity(&task).unwrap();
                (ctl.mode(), ctl.save_enabled())
            },
            {
                ctl.open_asset("pic.png").unwrap();
                (ctl.mode(), ctl.save_enabled())
            },
            {
                ctl.open_settings();
                (ctl.mode(), ctl.save_enabled())
            },
            {
                ctl.open_group(GroupRef::Tags);
                (ctl.mode(), ctl.save_enabled())
            },
        ];
        assert_eq!(
            steps,
            vec![
                (Mode::Note, true),
                (Mode::Task, true),
                (Mode::Asset, false),
                (Mode::Settings, false),
                (Mode::Summary, false),
            ]
        );
    }

    #[test]
    fn note_save_recomputes_tags_and_clears_dirty() {
        let mut ctl = controller();
        ctl.open_note("inbox.md").unwrap();
        assert!(ctl.note_tags().is_empty());

        ctl.edit_note_text("#Errand buy milk #errand");
        assert!(ctl.is_dirty());
        assert_eq!(ctl.note_tags(), ["Errand"]);

        ctl.save_current().unwrap();
        assert!(!ctl.is_dirty());
        assert_eq!(ctl.store().note("inbox.md").as_deref(), Some("#Errand buy milk #errand"));
        let tags: Vec<&str> = ctl
            .state()
            .snapshot()
            .tags
            .iter()
            .map(|g| g.tag.as_str())
            .collect();
        assert!(tags.contains(&"Errand"));
    }

    #[test]
    fn failed_note_save_stays_dirty() {
        let mut ctl = controller();
        ctl.open_note("inbox.md").unwrap();
        ctl.edit_note_text("draft");
        ctl.store().fail_next("disk full");

        let err = ctl.save_current().unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(ctl.is_dirty());
        assert_eq!(ctl.store().note("inbox.md").as_deref(), Some("hello"));

        // retry works once the store recovers
        ctl.save_current().unwrap();
        assert!(!ctl.is_dirty());
    }

    #[test]
    fn empty_store_message_falls_back() {
        let mut ctl = controller();
        ctl.open_note("inbox.md").unwrap();
        ctl.edit_note_text("draft");
        ctl.store().fail_next("");
        let err = ctl.save_current().unwrap_err();
        assert_eq!(err.to_string(), "Request failed");
    }

    #[test]
    fn invalid_task_is_reported_without_persisting() {
        let mut ctl = controller();
        ctl.new_task(Some("Home"));
        ctl.edit_task(|d| d.title = "   ".into());
        assert!(matches!(
            ctl.save_current(),
            Err(WorkspaceError::Validation(_))
        ));
        ctl.edit_task(|d| {
            d.title = "Paint".into();
            d.priority = 0;
        });
        assert!(matches!(
            ctl.save_current(),
            Err(WorkspaceError::Validation(_))
        ));
        assert!(ctl.state().snapshot().tasks.is_empty());
        assert!(ctl.is_dirty());
    }

    #[test]
    fn new_task_save_assigns_id_and_groups() {
        let mut ctl = controller();
        ctl.new_task(Some("Home"));
        ctl.edit_task(|d| d.title = "Paint".into());
        ctl.save_current().unwrap();

        let Some(EntityRef::Task(id)) = ctl.state().open_entity() else {
            panic!("task should be open");
        };
        assert!(!ctl.is_dirty());
        let group = ctl
            .index()
            .resolve(&GroupRef::Tasks(crate::ops::index::TaskScope::Project("Home".into())))
            .unwrap();
        assert_eq!(group.children().len(), 1);

        let toggled = ctl.toggle_task_completed(&id).unwrap();
        assert!(toggled.completed);
        let Surface::Task(view) = ctl.surface() else {
            panic!("expected task");
        };
        assert!(view.draft.completed);
    }

    #[test]
    fn settings_save_reloads_tree_when_templates_toggle() {
        let store = MemoryStore::new()
            .with_note("a.md", "")
            .with_note("default.template", "");
        let mut ctl = ModeController::new(store);
        ctl.load_workspace().unwrap();
        assert!(ctl.state().snapshot().tree.as_ref().unwrap().find("default.template").is_some());

        ctl.open_settings();
        ctl.edit_settings(|s| s.show_templates = false);
        assert!(ctl.save_enabled());
        ctl.save_current().unwrap();

        assert!(!ctl.is_dirty());
        assert!(!ctl.settings().show_templates);
        assert!(ctl.state().snapshot().tree.as_ref().unwrap().find("default.template").is_none());
        assert_eq!(
            ctl.store().last_settings_patch(),
            Some(SettingsPatch {
                show_templates: Some(false),
                ..SettingsPatch::default()
            })
        );
    }

    #[test]
    fn deleting_open_note_resets_to_summary() {
        let mut ctl = controller();
        ctl.open_note("work/plan.md").unwrap();
        ctl.edit_note_text("unsaved");
        ctl.delete_note("work/plan.md").unwrap();
        assert_eq!(ctl.mode(), Mode::Summary);
        assert!(!ctl.is_dirty());
    }

    #[test]
    fn deleting_folder_closes_notes_inside() {
        let mut ctl = controller();
        ctl.open_note("work/log.md").unwrap();
        ctl.delete_folder("work").unwrap();
        assert_eq!(ctl.mode(), Mode::Summary);

        ctl.open_note("inbox.md").unwrap();
        ctl.create_folder("", "later").unwrap();
        assert_eq!(ctl.mode(), Mode::Summary);
        ctl.open_note("inbox.md").unwrap();
        ctl.delete_folder("later").unwrap();
        assert_eq!(ctl.mode(), Mode::Note);
    }

    #[test]
    fn opening_missing_note_returns_to_summary() {
        let mut ctl = controller();
        ctl.open_note("inbox.md").unwrap();
        let err = ctl.open_note("gone.md").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ctl.mode(), Mode::Summary);
    }

    #[test]
    fn create_and_rename_note() {
        let mut ctl = controller();
        let path = ctl.create_note("work", "ideas").unwrap();
        assert_eq!(path, "work/ideas.md");
        assert_eq!(ctl.mode(), Mode::Note);
        assert!(ctl.create_note("work", "a/b").is_err());

        ctl.edit_note_text("x");
        let renamed = ctl.rename_note(&path, "thoughts").unwrap();
        assert_eq!(renamed, "work/thoughts.md");
        assert_eq!(ctl.state().open_entity(), Some(EntityRef::path("work/thoughts.md")));
        assert!(ctl.is_dirty());
    }

    #[test]
    fn late_save_for_abandoned_note_is_dropped() {
        let mut ctl = controller();
        ctl.open_note("inbox.md").unwrap();
        ctl.edit_note_text("first");
        let request = ctl.begin_save().unwrap();

        ctl.open_note("work/log.md").unwrap();
        ctl.edit_note_text("second");
        let result = ctl.run_save(&request);
        ctl.complete_save(request.ticket, result).unwrap();

        assert_eq!(ctl.mode(), Mode::Note);
        assert!(ctl.is_dirty());
        assert_eq!(ctl.state().open_entity(), Some(EntityRef::path("work/log.md")));
        assert!(ctl.state().in_flight().is_none());
    }

    #[test]
    fn late_new_task_save_does_not_adopt_a_later_draft() {
        let mut ctl = controller();
        ctl.new_task(None);
        ctl.edit_task(|d| d.title = "First".into());
        let request = ctl.begin_save().unwrap();

        ctl.new_task(None);
        ctl.edit_task(|d| d.title = "Second".into());
        let result = ctl.run_save(&request);
        ctl.complete_save(request.ticket, result).unwrap();
        assert_eq!(ctl.state().open_entity(), None);
        assert!(ctl.is_dirty());

        ctl.save_current().unwrap();
        let mut titles: Vec<&str> = ctl
            .state()
            .snapshot()
            .tasks
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn late_settings_save_updates_a_reopened_form() {
        let mut ctl = controller();
        ctl.open_settings();
        ctl.edit_settings(|s| s.dark_mode = true);
        let request = ctl.begin_save().unwrap();

        ctl.open_group(GroupRef::Folder(String::new()));
        ctl.open_settings();
        let result = ctl.run_save(&request);
        ctl.complete_save(request.ticket, result).unwrap();

        assert!(!ctl.is_dirty());
        assert!(!ctl.save_enabled());
        assert!(ctl.settings().dark_mode);
        let Surface::Settings(view) = ctl.surface() else {
            panic!("expected settings");
        };
        assert!(view.draft.dark_mode);
    }

    #[test]
    fn manual_save_while_in_flight_is_refused() {
        let mut ctl = controller();
        ctl.open_note("inbox.md").unwrap();
        ctl.edit_note_text("first");
        let _pending = ctl.begin_save().unwrap();
        assert!(matches!(ctl.save_current(), Err(WorkspaceError::SaveInFlight)));
    }

    #[test]
    fn autosave_waits_for_slow_save() {
        let t0 = Instant::now();
        let store = MemoryStore::new().with_note("a.md", "");
        {
            let mut settings = store.settings_mut();
            settings.autosave_enabled = true;
            settings.autosave_interval_seconds = 5;
        }
        let mut ctl = ModeController::new(store);
        ctl.load_workspace_at(t0).unwrap();
        ctl.open_note("a.md").unwrap();

        // every save takes 8s; sample once per second over 20s
        let mut pending: Option<(SaveRequest, Instant)> = None;
        let mut started = 0;
        for step in 1..=20 {
            let now = t0 + secs(step);
            ctl.edit_note_text(format!("edit {step}"));
            if let Some((_, done_at)) = &pending
                && now >= *done_at
                && let Some((request, _)) = pending.take()
            {
                let result = ctl.run_save(&request);
                ctl.complete_save_at(request.ticket, result, now).unwrap();
            }
            if let Some(request) = ctl.poll_autosave(now) {
                assert!(pending.is_none(), "second save started at {step}s");
                started += 1;
                pending = Some((request, now + secs(8)));
            }
        }
        assert_eq!(started, 2);
    }

    #[test]
    fn tick_runs_due_autosave() {
        let t0 = Instant::now();
        let store = MemoryStore::new().with_note("a.md", "");
        store.settings_mut().autosave_enabled = true;
        let mut ctl = ModeController::new(store);
        ctl.load_workspace_at(t0).unwrap();
        ctl.open_note("a.md").unwrap();
        ctl.edit_note_text("saved by timer");

        assert!(ctl.tick(t0 + secs(5)).is_none());
        assert!(ctl.tick(t0 + secs(30)).unwrap().is_ok());
        assert!(!ctl.is_dirty());
        assert_eq!(ctl.store().note("a.md").as_deref(), Some("saved by timer"));
        // clean note: nothing to do next period
        assert!(ctl.tick(t0 + secs(60)).is_none());
    }

    #[test]
    fn autosave_skips_other_modes() {
        let t0 = Instant::now();
        let store = MemoryStore::new().with_note("a.md", "");
        store.settings_mut().autosave_enabled = true;
        let mut ctl = ModeController::new(store);
        ctl.load_workspace_at(t0).unwrap();
        ctl.new_task(None);
        ctl.edit_task(|d| d.title = "x".into());
        assert!(ctl.tick(t0 + secs(30)).is_none());
        assert!(ctl.is_dirty());
    }

    #[test]
    fn scroll_sync_only_in_split_layout() {
        let now = Instant::now();
        let mut ctl = controller();
        ctl.open_note("inbox.md").unwrap();
        let a = ScrollMetrics::new(40.0, 100.0, 20.0);
        let b = ScrollMetrics::new(0.0, 100.0, 20.0);

        ctl.set_note_layout(Layout::Edit);
        assert_eq!(ctl.on_scroll(Pane::Editor, a, b, now), None);
        ctl.set_note_layout(Layout::Split);
        assert_eq!(ctl.on_scroll(Pane::Editor, a, b, now), Some(40.0));
    }

    #[test]
    fn search_passes_matches_through() {
        let ctl = controller();
        let matches = ctl.search("  plan ").unwrap();
        assert_eq!(
            matches,
            vec![SearchMatch::Note {
                path: "work/plan.md".into(),
                name: "plan.md".into(),
            }]
        );
    }

    #[test]
    fn store_notices_are_collected() {
        let store = MemoryStore::new();
        store.push_notice("Created tasks.json");
        let mut ctl = ModeController::new(store);
        ctl.load_workspace().unwrap();
        assert_eq!(ctl.take_notices(), vec!["Created tasks.json".to_string()]);
        assert!(ctl.take_notices().is_empty());
    }

    #[test]
    fn external_settings_change_reconfigures_autosave() {
        let t0 = Instant::now();
        let mut ctl = ModeController::new(MemoryStore::new().with_note("a.md", ""));
        ctl.load_workspace_at(t0).unwrap();
        assert!(!ctl.autosave().is_enabled());

        ctl.store().settings_mut().autosave_enabled = true;
        ctl.store().settings_mut().autosave_interval_seconds = 10;
        ctl.reload_settings_at(t0 + secs(1)).unwrap();
        assert!(ctl.settings().autosave_enabled);
        assert_eq!(ctl.autosave().next_deadline(), Some(t0 + secs(11)));

        // unchanged settings leave the schedule alone
        ctl.reload_settings_at(t0 + secs(5)).unwrap();
        assert_eq!(ctl.autosave().next_deadline(), Some(t0 + secs(11)));
    }
}
