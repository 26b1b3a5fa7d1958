use serde::Serialize;

use crate::model::{
    EntityRef, Layout, NodeKind, Settings, SettingsPatch, TagGroup, TaskDraft, TaskRecord,
    TreeNode,
};
use crate::ops::index::{ContentIndex, CreateScope, GroupRef, Summary};
use crate::ops::tags::extract_tags;

use super::WorkspaceError;

/// The single active content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Note,
    Task,
    Asset,
    Summary,
    Settings,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Note => "note",
            Mode::Task => "task",
            Mode::Asset => "asset",
            Mode::Summary => "summary",
            Mode::Settings => "settings",
        }
    }
}

// ---------------------------------------------------------------------------
// Surfaces
// ---------------------------------------------------------------------------

/// Aggregate counts for a folder or synthetic group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub group: Option<GroupRef>,
    pub counts: Option<Summary>,
    pub create: CreateScope,
}

impl SummaryView {
    /// Counts for `group`, or an empty view if the group is not in the index.
    pub fn for_group(index: &ContentIndex, group: Option<GroupRef>) -> Self {
        let node = group.as_ref().and_then(|g| index.resolve(g));
        SummaryView {
            counts: node.and_then(|n| n.summary()),
            create: node.map_or(CreateScope::Nothing, |n| n.create_scope()),
            group: node.and(group),
        }
    }

    fn empty() -> Self {
        SummaryView {
            group: None,
            counts: None,
            create: CreateScope::Nothing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub path: String,
    pub text: String,
    pub layout: Layout,
    /// Tags in the current text, first casing wins
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// `None` while the task has not been created yet
    pub id: Option<String>,
    pub draft: TaskDraft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetView {
    pub path: String,
    pub kind: NodeKind,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    /// Last snapshot from the store
    pub saved: Settings,
    pub draft: Settings,
}

/// What the workspace is currently showing. The variant is the mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Surface {
    Summary(SummaryView),
    Note(NoteView),
    Task(TaskView),
    Asset(AssetView),
    Settings(SettingsView),
}

impl Surface {
    pub fn mode(&self) -> Mode {
        match self {
            Surface::Summary(_) => Mode::Summary,
            Surface::Note(_) => Mode::Note,
            Surface::Task(_) => Mode::Task,
            Surface::Asset(_) => Mode::Asset,
            Surface::Settings(_) => Mode::Settings,
        }
    }

    /// The stored entity this surface edits or shows, if any.
    pub fn entity(&self) -> Option<EntityRef> {
        match self {
            Surface::Note(v) => Some(EntityRef::path(&v.path)),
            Surface::Asset(v) => Some(EntityRef::path(&v.path)),
            Surface::Task(TaskView { id: Some(id), .. }) => Some(EntityRef::task(id)),
            _ => None,
        }
    }

    /// Effective layout. Tasks are edit-only, assets preview-only.
    pub fn layout(&self) -> Option<Layout> {
        match self {
            Surface::Note(v) => Some(v.layout),
            Surface::Task(_) => Some(Layout::Edit),
            Surface::Asset(_) => Some(Layout::Preview),
            Surface::Summary(_) | Surface::Settings(_) => None,
        }
    }

    /// Only note mode offers the edit/preview/split selector.
    pub fn shows_layout_selector(&self) -> bool {
        matches!(self, Surface::Note(_))
    }

    fn save_target(&self) -> Option<SaveTarget> {
        match self {
            Surface::Note(v) => Some(SaveTarget::Note(v.path.clone())),
            Surface::Task(v) => Some(SaveTarget::Task(v.id.clone())),
            Surface::Settings(_) => Some(SaveTarget::Settings),
            Surface::Summary(_) | Surface::Asset(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Saves
// ---------------------------------------------------------------------------

/// What a save writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Note(String),
    Task(Option<String>),
    Settings,
}

/// Identifies one in-flight save. Only the matching ticket may complete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    pub id: u64,
    pub target: SaveTarget,
    /// Edit revision captured when the save began
    pub revision: u64,
    /// Surface entry the save was started from
    pub entry: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavePayload {
    Note { path: String, content: String },
    Task { id: Option<String>, draft: TaskDraft },
    Settings(SettingsPatch),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub ticket: SaveTicket,
    pub payload: SavePayload,
}

/// What the store returned for a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Note { path: String },
    Task(TaskRecord),
    Settings(Settings),
}

/// How a completion relates to the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Unknown ticket; nothing changed
    Ignored,
    /// The flag was released but the entity is no longer open
    Stale,
    /// The entity is still open; `unchanged` is false if it was edited
    /// again after the save began
    Current { unchanged: bool },
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Raw store data and the index derived from it. Replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tree: Option<TreeNode>,
    pub tasks: Vec<TaskRecord>,
    pub tags: Vec<TagGroup>,
    pub index: ContentIndex,
}

impl Snapshot {
    pub fn new(tree: Option<TreeNode>, tasks: Vec<TaskRecord>, tags: Vec<TagGroup>) -> Self {
        let index = ContentIndex::build(tree.as_ref(), &tasks, &tags);
        Snapshot {
            tree,
            tasks,
            tags,
            index,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkspaceState
// ---------------------------------------------------------------------------

/// Everything the workspace shows. Mode changes go through the consuming
/// transitions below; each one resets dirty state and edit buffers.
#[derive(Debug, Clone)]
pub struct WorkspaceState {
    surface: Surface,
    dirty: bool,
    revision: u64,
    /// Bumped on every surface switch
    entry: u64,
    in_flight: Option<SaveTicket>,
    next_ticket: u64,
    note_layout: Option<Layout>,
    settings: Settings,
    snapshot: Snapshot,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        WorkspaceState {
            surface: Surface::Summary(SummaryView::empty()),
            dirty: false,
            revision: 0,
            entry: 0,
            in_flight: None,
            next_ticket: 1,
            note_layout: None,
            settings: Settings::default(),
            snapshot: Snapshot::default(),
        }
    }
}

impl WorkspaceState {
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn mode(&self) -> Mode {
        self.surface.mode()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn index(&self) -> &ContentIndex {
        &self.snapshot.index
    }

    pub fn open_entity(&self) -> Option<EntityRef> {
        self.surface.entity()
    }

    /// Layout last used in note mode, if any.
    pub fn note_layout(&self) -> Option<Layout> {
        self.note_layout
    }

    pub fn in_flight(&self) -> Option<&SaveTicket> {
        self.in_flight.as_ref()
    }

    /// Tags of the open note.
    pub fn note_tags(&self) -> &[String] {
        match &self.surface {
            Surface::Note(v) => &v.tags,
            _ => &[],
        }
    }

    /// Whether the save affordance is enabled.
    pub fn save_enabled(&self) -> bool {
        match &self.surface {
            Surface::Note(_) | Surface::Task(_) => true,
            Surface::Settings(v) => v.saved != v.draft,
            Surface::Summary(_) | Surface::Asset(_) => false,
        }
    }

    /// Note mode, open note, unsaved edits, nothing in flight.
    pub fn autosave_ready(&self) -> bool {
        matches!(self.surface, Surface::Note(_)) && self.dirty && self.in_flight.is_none()
    }

    // -- transitions --------------------------------------------------------

    /// Switch to a new surface, dropping the previous edit buffers.
    /// An in-flight save keeps running.
    pub fn enter(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self.dirty = false;
        self.revision += 1;
        self.entry += 1;
        self
    }

    pub fn enter_summary(self, group: Option<GroupRef>) -> Self {
        let view = SummaryView::for_group(&self.snapshot.index, group);
        self.enter(Surface::Summary(view))
    }

    /// Open note text in the last note layout, or the configured default.
    pub fn enter_note(self, path: String, text: String) -> Self {
        let layout = self.note_layout.unwrap_or(self.settings.default_view);
        let tags = extract_tags(&text);
        self.enter(Surface::Note(NoteView {
            path,
            text,
            layout,
            tags,
        }))
    }

    pub fn enter_settings(self) -> Self {
        let view = SettingsView {
            saved: self.settings.clone(),
            draft: self.settings.clone(),
        };
        self.enter(Surface::Settings(view))
    }

    /// Replace the raw data and index. A summary view is recounted.
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = snapshot;
        if let Surface::Summary(view) = &self.surface {
            let group = view.group.clone();
            self.surface = Surface::Summary(SummaryView::for_group(&self.snapshot.index, group));
        }
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Restore a persisted note layout.
    pub fn with_note_layout(mut self, layout: Option<Layout>) -> Self {
        self.note_layout = layout;
        self
    }

    // -- edits --------------------------------------------------------------

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Replace note text. Returns false outside note mode.
    pub fn set_note_text(&mut self, text: String) -> bool {
        let Surface::Note(view) = &mut self.surface else {
            return false;
        };
        if view.text == text {
            return true;
        }
        view.tags = extract_tags(&text);
        view.text = text;
        self.touch();
        true
    }

    pub fn set_note_layout(&mut self, layout: Layout) -> bool {
        let Surface::Note(view) = &mut self.surface else {
            return false;
        };
        view.layout = layout;
        self.note_layout = Some(layout);
        true
    }

    pub fn edit_task(&mut self, edit: impl FnOnce(&mut TaskDraft)) -> bool {
        let Surface::Task(view) = &mut self.surface else {
            return false;
        };
        let before = view.draft.clone();
        edit(&mut view.draft);
        if view.draft != before {
            self.touch();
        }
        true
    }

    pub fn edit_settings(&mut self, edit: impl FnOnce(&mut Settings)) -> bool {
        let Surface::Settings(view) = &mut self.surface else {
            return false;
        };
        edit(&mut view.draft);
        let changed = view.draft != view.saved;
        self.dirty = changed;
        self.revision += 1;
        true
    }

    /// Point the open note at a new path after a rename.
    pub fn retarget_note(&mut self, from: &str, to: &str) {
        if let Surface::Note(view) = &mut self.surface {
            if view.path == from {
                view.path = to.to_string();
            } else if let Some(rest) = view.path.strip_prefix(from)
                && rest.starts_with('/')
            {
                view.path = format!("{}{}", to, rest);
            }
        }
    }

    /// Refresh the open task's draft from a stored record, unless it has
    /// unsaved edits.
    pub fn refresh_task(&mut self, record: &TaskRecord) {
        if self.dirty {
            return;
        }
        if let Surface::Task(view) = &mut self.surface
            && view.id.as_deref() == Some(record.id.as_str())
        {
            view.draft = TaskDraft::from(record);
        }
    }

    // -- saves --------------------------------------------------------------

    /// Start a save of the current surface and mark it in flight.
    ///
    /// Task drafts are validated here; a validation error leaves the state
    /// untouched.
    pub fn begin_save(&mut self) -> Result<SaveRequest, WorkspaceError> {
        if self.in_flight.is_some() {
            return Err(WorkspaceError::SaveInFlight);
        }
        let payload = match &self.surface {
            Surface::Note(v) => SavePayload::Note {
                path: v.path.clone(),
                content: v.text.clone(),
            },
            Surface::Task(v) => {
                v.draft.validate()?;
                SavePayload::Task {
                    id: v.id.clone(),
                    draft: v.draft.clone(),
                }
            }
            Surface::Settings(v) => {
                let patch = v.saved.diff(&v.draft);
                if patch.is_empty() {
                    return Err(WorkspaceError::NothingToSave);
                }
                SavePayload::Settings(patch.validated()?)
            }
            Surface::Summary(_) | Surface::Asset(_) => return Err(WorkspaceError::NothingToSave),
        };
        let target = self
            .surface
            .save_target()
            .ok_or(WorkspaceError::NothingToSave)?;
        let ticket = SaveTicket {
            id: self.next_ticket,
            target,
            revision: self.revision,
            entry: self.entry,
        };
        self.next_ticket += 1;
        self.in_flight = Some(ticket.clone());
        Ok(SaveRequest { ticket, payload })
    }

    /// Release the in-flight flag for `ticket` and report whether its
    /// entity is still the one on screen.
    ///
    /// New task drafts and the settings form have no identity of their
    /// own, so for those only the surface entry the save began from counts.
    pub fn finish_save(&mut self, ticket: &SaveTicket) -> Completion {
        if self.in_flight.as_ref().map(|t| t.id) != Some(ticket.id) {
            return Completion::Ignored;
        }
        self.in_flight = None;
        if self.surface.save_target().as_ref() != Some(&ticket.target) {
            return Completion::Stale;
        }
        let anonymous = matches!(ticket.target, SaveTarget::Task(None) | SaveTarget::Settings);
        if anonymous && ticket.entry != self.entry {
            return Completion::Stale;
        }
        Completion::Current {
            unchanged: self.revision == ticket.revision,
        }
    }

    /// Apply a successful note save.
    pub fn saved_note(&mut self, unchanged: bool) {
        if unchanged {
            self.dirty = false;
        }
    }

    /// Apply a successful task save. A created task gets its id.
    pub fn saved_task(&mut self, record: &TaskRecord, unchanged: bool) {
        if let Surface::Task(view) = &mut self.surface {
            view.id = Some(record.id.clone());
            if unchanged {
                view.draft = TaskDraft::from(record);
                self.dirty = false;
            }
        }
    }

    /// Apply a successful settings save.
    pub fn saved_settings(&mut self, settings: Settings, unchanged: bool) {
        if let Surface::Settings(view) = &mut self.surface {
            view.saved = settings.clone();
            if unchanged {
                view.draft = settings.clone();
                self.dirty = false;
            } else {
                self.dirty = view.draft != view.saved;
            }
        }
        self.settings = settings;
    }

    /// Take stored settings from a save that finished after its form was
    /// left. An open settings form that has not been edited shows them;
    /// an edited one keeps its draft and compares against them.
    pub fn adopt_settings(&mut self, settings: Settings) {
        if let Surface::Settings(view) = &mut self.surface {
            if !self.dirty {
                view.draft = settings.clone();
            }
            view.saved = settings.clone();
            self.dirty = view.draft != view.saved;
        }
        self.settings = settings;
    }
}
