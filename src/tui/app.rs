use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::io::config_io::load_config;
use crate::io::fs_store::FsStore;
use crate::io::logging::{self, LogTarget};
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::watcher::{FileEvent, NotesWatcher, touches_settings, touches_tasks};
use crate::model::{ClientConfig, EntityRef, SearchMatch};
use crate::ops::index::{CreateScope, IndexNode};
use crate::util::path::parent;
use crate::workspace::{ModeController, Pane, ScrollMetrics, Surface, WorkspaceError};

use super::editor::{EditorState, clamp_cursor};
use super::input;
use super::render;
use super::theme::Theme;

/// Which half of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

/// What a one-line prompt in the status row will create or rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewNote { folder: String },
    NewFolder { parent: String },
    RenameNote { path: String },
    RenameFolder { path: String },
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::NewNote { .. } => "New note",
            PromptKind::NewFolder { .. } => "New folder",
            PromptKind::RenameNote { .. } | PromptKind::RenameFolder { .. } => "Rename to",
        }
    }
}

/// Something waiting on a y/n confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Note(String),
    Folder(String),
    Task { id: String, title: String },
}

impl DeleteTarget {
    pub fn describe(&self) -> String {
        match self {
            DeleteTarget::Note(path) => format!("note {}", path),
            DeleteTarget::Folder(path) => format!("folder {} and everything in it", path),
            DeleteTarget::Task { title, .. } => format!("task \"{}\"", title),
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Navigate,
    /// Typing a search query in the status row
    Search,
    /// Browsing search results
    Results,
    Prompt(PromptKind),
    Confirm(DeleteTarget),
}

/// A status-row message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// A flattened, visible row of the sidebar forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    /// Section index followed by child indices
    pub path: Vec<usize>,
    pub depth: usize,
    pub key: String,
    pub expandable: bool,
    pub expanded: bool,
}

/// Where the note panes were drawn last frame, for mouse hit-testing and
/// scroll geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaneGeometry {
    pub editor: Option<Rect>,
    pub preview: Option<Rect>,
    pub editor_lines: usize,
    pub preview_lines: usize,
}

impl PaneGeometry {
    pub fn area(&self, pane: Pane) -> Option<Rect> {
        match pane {
            Pane::Editor => self.editor,
            Pane::Preview => self.preview,
        }
    }

    pub fn pane_at(&self, column: u16, row: u16) -> Option<Pane> {
        let hit = |r: Option<Rect>| {
            r.is_some_and(|r| {
                column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
            })
        };
        if hit(self.editor) {
            Some(Pane::Editor)
        } else if hit(self.preview) {
            Some(Pane::Preview)
        } else {
            None
        }
    }
}

/// Main application state
pub struct App {
    pub ctl: ModeController<FsStore>,
    pub notes_dir: PathBuf,
    pub config: ClientConfig,
    pub theme: Theme,
    pub focus: Focus,
    pub input: InputMode,
    pub should_quit: bool,
    /// Set by a first quit request while there are unsaved edits
    pub quit_armed: bool,
    /// Sidebar keys of expanded groups
    pub expanded: BTreeSet<String>,
    pub sidebar_cursor: usize,
    pub sidebar_scroll: usize,
    pub editor: EditorState,
    pub preview_scroll: usize,
    pub asset_scroll: usize,
    /// Selected field in the task or settings form
    pub form_field: usize,
    pub search_input: String,
    pub last_search: Option<String>,
    pub search_results: Vec<SearchMatch>,
    pub results_cursor: usize,
    pub prompt_input: String,
    pub message: Option<Message>,
    pub panes: PaneGeometry,
    /// Entity the per-surface cursors belong to
    shown: Option<EntityRef>,
}

impl App {
    pub fn new(ctl: ModeController<FsStore>, notes_dir: PathBuf, config: ClientConfig) -> Self {
        let theme = Theme::from_config(&config.ui, ctl.settings().dark_mode);
        let mut app = App {
            ctl,
            notes_dir,
            config,
            theme,
            focus: Focus::Sidebar,
            input: InputMode::Navigate,
            should_quit: false,
            quit_armed: false,
            expanded: BTreeSet::new(),
            sidebar_cursor: 0,
            sidebar_scroll: 0,
            editor: EditorState::default(),
            preview_scroll: 0,
            asset_scroll: 0,
            form_field: 0,
            search_input: String::new(),
            last_search: None,
            search_results: Vec::new(),
            results_cursor: 0,
            prompt_input: String::new(),
            message: None,
            panes: PaneGeometry::default(),
            shown: None,
        };
        // The file tree starts open
        if let Some(files) = app.ctl.index().files() {
            app.expanded.insert(files.key());
        }
        app.take_notices();
        app
    }

    // -----------------------------------------------------------------------
    // Sidebar
    // -----------------------------------------------------------------------

    /// Build the flat list of visible sidebar rows
    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for (i, section) in self.ctl.index().sections.iter().enumerate() {
            flatten_node(section, vec![i], 0, &self.expanded, &mut rows);
        }
        rows
    }

    pub fn selected_row(&self) -> Option<SidebarRow> {
        self.sidebar_rows().into_iter().nth(self.sidebar_cursor)
    }

    pub fn selected_node(&self) -> Option<&IndexNode> {
        let row = self.selected_row()?;
        self.ctl.index().node_at(&row.path)
    }

    pub fn clamp_sidebar_cursor(&mut self) {
        let len = self.sidebar_rows().len();
        self.sidebar_cursor = self.sidebar_cursor.min(len.saturating_sub(1));
    }

    pub fn move_sidebar(&mut self, delta: isize) {
        let len = self.sidebar_rows().len();
        if len == 0 {
            return;
        }
        self.sidebar_cursor = self
            .sidebar_cursor
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    /// Expand (`true`) or collapse the selected group. Collapsing a leaf or
    /// an already collapsed group moves to its parent row.
    pub fn set_expanded(&mut self, expand: bool) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if expand {
            if row.expandable {
                self.expanded.insert(row.key);
            }
            return;
        }
        if row.expanded {
            self.expanded.remove(&row.key);
            return;
        }
        if row.path.len() > 1 {
            let parent_path = &row.path[..row.path.len() - 1];
            if let Some(idx) = self
                .sidebar_rows()
                .iter()
                .position(|r| r.path == parent_path)
            {
                self.sidebar_cursor = idx;
            }
        }
    }

    /// Where "new" creates things for the current selection
    pub fn selected_scope(&self) -> CreateScope {
        match self.selected_node() {
            Some(IndexNode::Note { path, .. })
            | Some(IndexNode::Asset { path, .. })
            | Some(IndexNode::Pdf { path, .. })
            | Some(IndexNode::Csv { path, .. }) => CreateScope::Note {
                folder: parent(path).to_string(),
            },
            Some(IndexNode::Task(task)) => CreateScope::Task {
                project: task.project_name().map(str::to_string),
            },
            Some(node) => node.create_scope(),
            None => match self.ctl.surface() {
                Surface::Summary(view) => view.create.clone(),
                _ => CreateScope::Nothing,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: true,
        });
    }

    fn take_notices(&mut self) {
        let notices = self.ctl.take_notices();
        if !notices.is_empty() {
            self.info(notices.join("; "));
        }
    }

    /// Report an operation result and resync per-surface state.
    pub fn report(&mut self, result: Result<(), WorkspaceError>) {
        if let Err(e) = result {
            self.error(e.to_string());
        }
        self.after_action();
    }

    /// Called after anything that may have changed the surface or index.
    pub fn after_action(&mut self) {
        self.take_notices();
        self.clamp_sidebar_cursor();
        let open = self.ctl.state().open_entity();
        if open != self.shown {
            self.editor.reset();
            self.preview_scroll = 0;
            self.asset_scroll = 0;
            self.form_field = 0;
            self.shown = open;
        }
        if let Surface::Note(note) = self.ctl.surface() {
            self.editor.cursor = clamp_cursor(&note.text, self.editor.cursor);
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Open the selected sidebar node. Leaves move focus to the content.
    pub fn open_selected(&mut self) {
        let Some(node) = self.selected_node().cloned() else {
            return;
        };
        let result = self.ctl.open_node(&node);
        let opened = result.is_ok() && node.entity().is_some();
        self.report(result);
        if opened {
            self.focus = Focus::Content;
        }
    }

    pub fn open_entity(&mut self, entity: &EntityRef) {
        let result = self.ctl.open_entity(entity);
        let ok = result.is_ok();
        self.report(result);
        if ok {
            self.focus = Focus::Content;
        }
    }

    pub fn open_settings(&mut self) {
        self.ctl.open_settings();
        self.after_action();
        self.focus = Focus::Content;
    }

    pub fn save(&mut self) {
        let was_settings = matches!(self.ctl.surface(), Surface::Settings(_));
        match self.ctl.save_current() {
            Ok(()) => self.info("Saved"),
            Err(WorkspaceError::NothingToSave) => {}
            Err(e) => self.error(e.to_string()),
        }
        if was_settings {
            self.refresh_theme();
        }
        self.after_action();
    }

    pub fn refresh_theme(&mut self) {
        self.theme = Theme::from_config(&self.config.ui, self.ctl.settings().dark_mode);
    }

    pub fn reload(&mut self) {
        match self.ctl.reload_index() {
            Ok(()) => self.info("Reloaded"),
            Err(e) => self.error(e.to_string()),
        }
        self.after_action();
    }

    /// Start creating something in `scope`. Notes and folders prompt for
    /// a name; tasks open a blank form.
    pub fn new_item(&mut self, scope: CreateScope, folder_only: bool) {
        match (scope, folder_only) {
            (CreateScope::Note { folder }, false) => {
                self.prompt_input.clear();
                self.input = InputMode::Prompt(PromptKind::NewNote { folder });
            }
            (CreateScope::Note { folder }, true) => {
                self.prompt_input.clear();
                self.input = InputMode::Prompt(PromptKind::NewFolder { parent: folder });
            }
            (CreateScope::Task { project }, false) => {
                self.ctl.new_task(project.as_deref());
                self.after_action();
                self.focus = Focus::Content;
            }
            _ => self.error("Nothing can be created here"),
        }
    }

    pub fn start_rename(&mut self) {
        let kind = match self.selected_node() {
            Some(IndexNode::Folder { path, .. }) if !path.is_empty() => {
                PromptKind::RenameFolder { path: path.clone() }
            }
            Some(IndexNode::Note { path, .. }) => PromptKind::RenameNote { path: path.clone() },
            _ => {
                self.error("Only notes and folders can be renamed");
                return;
            }
        };
        self.prompt_input = match &kind {
            PromptKind::RenameNote { path } | PromptKind::RenameFolder { path } => {
                crate::util::path::file_stem(path).to_string()
            }
            _ => String::new(),
        };
        self.input = InputMode::Prompt(kind);
    }

    pub fn submit_prompt(&mut self, kind: PromptKind) {
        let name = std::mem::take(&mut self.prompt_input);
        self.input = InputMode::Navigate;
        let result = match &kind {
            PromptKind::NewNote { folder } => self.ctl.create_note(folder, &name).map(|_| {
                self.focus = Focus::Content;
            }),
            PromptKind::NewFolder { parent } => self.ctl.create_folder(parent, &name).map(|path| {
                self.expanded.insert(format!("folder:{}", parent));
                self.expanded.insert(format!("folder:{}", path));
            }),
            PromptKind::RenameNote { path } => self.ctl.rename_note(path, &name).map(|_| ()),
            PromptKind::RenameFolder { path } => self.ctl.rename_folder(path, &name).map(|_| ()),
        };
        self.report(result);
    }

    pub fn start_delete(&mut self) {
        let target = match self.selected_node() {
            Some(IndexNode::Folder { path, .. }) if !path.is_empty() => {
                DeleteTarget::Folder(path.clone())
            }
            Some(IndexNode::Note { path, .. }) => DeleteTarget::Note(path.clone()),
            Some(IndexNode::Task(task)) => DeleteTarget::Task {
                id: task.id.clone(),
                title: task.title.clone(),
            },
            _ => {
                self.error("Nothing to delete here");
                return;
            }
        };
        self.input = InputMode::Confirm(target);
    }

    pub fn confirm_delete(&mut self, target: DeleteTarget) {
        self.input = InputMode::Navigate;
        let result = match &target {
            DeleteTarget::Note(path) => self.ctl.delete_note(path),
            DeleteTarget::Folder(path) => self.ctl.delete_folder(path),
            DeleteTarget::Task { id, .. } => self.ctl.delete_task(id),
        };
        if result.is_ok() {
            self.info(format!("Deleted {}", target.describe()));
        }
        self.report(result);
    }

    /// Toggle completion of the selected task, or the open one.
    pub fn toggle_task(&mut self) {
        let id = match (self.focus, self.selected_node(), self.ctl.state().open_entity()) {
            (Focus::Sidebar, Some(IndexNode::Task(task)), _) => task.id.clone(),
            (Focus::Content, _, Some(EntityRef::Task(id))) => id,
            (_, _, _) => return,
        };
        let result = self.ctl.toggle_task_completed(&id).map(|record| {
            self.info(if record.completed {
                format!("Completed \"{}\"", record.title)
            } else {
                format!("Reopened \"{}\"", record.title)
            });
        });
        self.report(result);
    }

    pub fn run_search(&mut self) {
        let query = std::mem::take(&mut self.search_input);
        if query.trim().is_empty() {
            self.input = InputMode::Navigate;
            return;
        }
        match self.ctl.search(&query) {
            Ok(results) => {
                self.search_results = results;
                self.results_cursor = 0;
                self.input = InputMode::Results;
            }
            Err(e) => {
                self.error(e.to_string());
                self.input = InputMode::Navigate;
            }
        }
        self.last_search = Some(query);
    }

    pub fn open_search_result(&mut self) {
        self.input = InputMode::Navigate;
        if let Some(entity) = self
            .search_results
            .get(self.results_cursor)
            .map(SearchMatch::entity)
        {
            self.open_entity(&entity);
        }
    }

    pub fn request_quit(&mut self) {
        if self.ctl.is_dirty() && !self.quit_armed {
            self.quit_armed = true;
            self.error("Unsaved changes: Ctrl-S to save, q again to discard");
            return;
        }
        self.should_quit = true;
    }

    // -----------------------------------------------------------------------
    // Note panes
    // -----------------------------------------------------------------------

    fn pane_scroll(&self, pane: Pane) -> usize {
        match pane {
            Pane::Editor => self.editor.scroll,
            Pane::Preview => self.preview_scroll,
        }
    }

    fn set_pane_scroll(&mut self, pane: Pane, value: usize) {
        match pane {
            Pane::Editor => self.editor.scroll = value,
            Pane::Preview => self.preview_scroll = value,
        }
    }

    pub fn pane_metrics(&self, pane: Pane) -> ScrollMetrics {
        let (lines, height) = match pane {
            Pane::Editor => (self.panes.editor_lines, self.panes.editor),
            Pane::Preview => (self.panes.preview_lines, self.panes.preview),
        };
        let height = height.map_or(0, |r| r.height);
        ScrollMetrics::new(
            self.pane_scroll(pane) as f64,
            lines as f64,
            f64::from(height),
        )
    }

    /// Scroll `pane` by `delta` rows. `direct` marks user input on the
    /// pane, which lets it drive the other one.
    pub fn scroll_pane(&mut self, pane: Pane, delta: isize, direct: bool, now: Instant) {
        if direct {
            self.ctl.note_scroll_input(pane, now);
        }
        let max = self.pane_metrics(pane).max_scroll() as usize;
        let next = self.pane_scroll(pane).saturating_add_signed(delta).min(max);
        if next == self.pane_scroll(pane) {
            return;
        }
        self.set_pane_scroll(pane, next);
        self.follow_scroll(pane, now);
    }

    /// Mirror `pane`'s scroll position onto the other pane if it leads.
    pub fn follow_scroll(&mut self, pane: Pane, now: Instant) {
        let src = self.pane_metrics(pane);
        let dst = self.pane_metrics(pane.other());
        if let Some(pos) = self.ctl.on_scroll(pane, src, dst, now) {
            self.set_pane_scroll(pane.other(), pos.round() as usize);
        }
    }

    // -----------------------------------------------------------------------
    // Background work
    // -----------------------------------------------------------------------

    /// How long the event loop may block before the next autosave is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let idle = Duration::from_millis(250);
        match self.ctl.autosave().next_deadline() {
            Some(due) => due.saturating_duration_since(now).min(idle),
            None => idle,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        match self.ctl.tick(now) {
            Some(Ok(())) => self.info("Autosaved"),
            Some(Err(e)) => self.error(format!("Autosave failed: {}", e)),
            None => return,
        }
        self.after_action();
    }

    /// React to external file changes.
    pub fn on_files_changed(&mut self, paths: &[PathBuf]) {
        if touches_settings(&self.notes_dir, paths) {
            match self.ctl.reload_settings() {
                Ok(()) => self.refresh_theme(),
                Err(e) => self.error(e.to_string()),
            }
        }
        if let Err(e) = self.ctl.reload_index() {
            self.error(e.to_string());
        }
        // Pick up external edits of the open entity unless we have our own
        let reopen = match self.ctl.state().open_entity() {
            _ if self.ctl.is_dirty() => None,
            Some(EntityRef::Path(path))
                if matches!(self.ctl.surface(), Surface::Note(_))
                    && paths.iter().any(|p| p == &self.notes_dir.join(&path)) =>
            {
                Some(EntityRef::Path(path))
            }
            Some(EntityRef::Task(id)) if touches_tasks(&self.notes_dir, paths) => {
                Some(EntityRef::Task(id))
            }
            _ => None,
        };
        match reopen {
            Some(entity) => {
                let result = self.ctl.open_entity(&entity);
                self.report(result);
            }
            None => self.after_action(),
        }
    }
}

/// Recursively flatten a node into visible rows based on expand state
fn flatten_node(
    node: &IndexNode,
    path: Vec<usize>,
    depth: usize,
    expanded: &BTreeSet<String>,
    rows: &mut Vec<SidebarRow>,
) {
    let key = node.key();
    let expandable = !node.children().is_empty();
    let is_expanded = expandable && expanded.contains(&key);
    rows.push(SidebarRow {
        path: path.clone(),
        depth,
        key,
        expandable,
        expanded: is_expanded,
    });
    if is_expanded {
        for (i, child) in node.children().iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(i);
            flatten_node(child, child_path, depth + 1, expanded, rows);
        }
    }
}

/// Restore UI state from .quill/state.json
pub fn restore_ui_state(app: &mut App, ui_state: UiState) {
    if !ui_state.expanded.is_empty() {
        app.expanded = ui_state.expanded;
    }
    app.last_search = ui_state.last_search;
    if let Some(entity) = ui_state.last_entity {
        // A vanished entity falls back to the summary view
        let _ = app.ctl.open_entity(&entity);
        app.after_action();
    }
}

/// Save UI state to .quill/state.json
pub fn save_ui_state(app: &App) {
    let ui_state = UiState {
        note_layout: app.ctl.state().note_layout(),
        expanded: app.expanded.clone(),
        last_entity: app.ctl.state().open_entity(),
        last_search: app.last_search.clone(),
    };
    if let Err(e) = write_ui_state(&app.notes_dir, &ui_state) {
        warn!(error = %e, "could not write ui state");
    }
}

/// Run the TUI application
pub fn run(notes_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(notes_dir)?;
    logging::init(notes_dir, &config.log, LogTarget::File);
    info!(dir = %notes_dir.display(), "starting");

    let store = FsStore::new(notes_dir).with_note_task_sync(config.store.sync_note_tasks);
    let mut ctl = ModeController::new(store);
    let ui_state = read_ui_state(notes_dir).unwrap_or_default();
    ctl.restore_note_layout(ui_state.note_layout);
    let loaded = ctl.load_workspace();

    let mut app = App::new(ctl, notes_dir.to_path_buf(), config);
    restore_ui_state(&mut app, ui_state);
    if let Err(e) = loaded {
        app.error(e.to_string());
    }

    let watcher = NotesWatcher::start(notes_dir)
        .inspect_err(|e| warn!(error = %e, "file watcher unavailable"))
        .ok();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    app.ctl.shutdown();
    save_ui_state(&app);
    info!("exiting");

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&NotesWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    // Debounced state save: every ~5 key presses
                    save_counter += 1;
                    if save_counter >= 5 {
                        save_ui_state(app);
                        save_counter = 0;
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if let Some(watcher) = watcher {
            for FileEvent::Changed(paths) in watcher.poll() {
                app.on_files_changed(&paths);
            }
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
