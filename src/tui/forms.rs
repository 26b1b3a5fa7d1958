//! Field tables for the task and settings forms, shared by input and render.

use crate::model::{Layout, Settings, TaskDraft};

const MAX_NUMBER_FIELD: u32 = 99_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Project,
    Tags,
    Due,
    Priority,
    Completed,
    Notes,
}

pub const TASK_FIELDS: [TaskField; 7] = [
    TaskField::Title,
    TaskField::Project,
    TaskField::Tags,
    TaskField::Due,
    TaskField::Priority,
    TaskField::Completed,
    TaskField::Notes,
];

impl TaskField {
    pub fn label(self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::Project => "Project",
            TaskField::Tags => "Tags",
            TaskField::Due => "Due",
            TaskField::Priority => "Priority",
            TaskField::Completed => "Completed",
            TaskField::Notes => "Notes",
        }
    }

    pub fn value(self, draft: &TaskDraft) -> String {
        match self {
            TaskField::Title => draft.title.clone(),
            TaskField::Project => draft.project.clone(),
            TaskField::Tags => draft.tags.join(","),
            TaskField::Due => draft.due_date.clone(),
            TaskField::Priority => draft.priority.to_string(),
            TaskField::Completed => checkbox(draft.completed).to_string(),
            TaskField::Notes => draft.notes.clone(),
        }
    }

    /// Placeholder shown while the field is empty.
    pub fn hint(self) -> &'static str {
        match self {
            TaskField::Tags => "comma separated",
            TaskField::Due => "YYYY-MM-DD",
            TaskField::Priority => "1-5",
            _ => "",
        }
    }

    /// Type a character into the field.
    pub fn push_char(self, draft: &mut TaskDraft, c: char) {
        match self {
            TaskField::Title => draft.title.push(c),
            TaskField::Project => draft.project.push(c),
            TaskField::Tags => {
                let mut text = draft.tags.join(",");
                text.push(c);
                draft.tags = split_tags(&text);
            }
            TaskField::Due => draft.due_date.push(c),
            TaskField::Priority => {
                if let Some(d) = c.to_digit(10) {
                    draft.priority = i64::from(d);
                }
            }
            TaskField::Completed => {
                if c == ' ' {
                    draft.completed = !draft.completed;
                }
            }
            TaskField::Notes => draft.notes.push(c),
        }
    }

    pub fn pop_char(self, draft: &mut TaskDraft) {
        match self {
            TaskField::Title => {
                draft.title.pop();
            }
            TaskField::Project => {
                draft.project.pop();
            }
            TaskField::Tags => {
                let mut text = draft.tags.join(",");
                text.pop();
                draft.tags = split_tags(&text);
            }
            TaskField::Due => {
                draft.due_date.pop();
            }
            TaskField::Notes => {
                draft.notes.pop();
            }
            TaskField::Priority | TaskField::Completed => {}
        }
    }

    /// Step a non-text field. Returns false for text fields.
    pub fn adjust(self, draft: &mut TaskDraft, delta: i64) -> bool {
        match self {
            TaskField::Priority => {
                draft.priority = (draft.priority + delta).clamp(1, 5);
                true
            }
            TaskField::Completed => {
                draft.completed = !draft.completed;
                true
            }
            _ => false,
        }
    }
}

/// Split the raw tags text without trimming so that it joins back to
/// exactly what was typed.
fn split_tags(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(str::to_string).collect()
}

fn checkbox(on: bool) -> &'static str {
    if on { "[x]" } else { "[ ]" }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    DarkMode,
    DefaultView,
    AutosaveEnabled,
    AutosaveInterval,
    SidebarWidth,
    DefaultFolder,
    DailyFolder,
    ShowTemplates,
}

pub const SETTINGS_FIELDS: [SettingsField; 8] = [
    SettingsField::DarkMode,
    SettingsField::DefaultView,
    SettingsField::AutosaveEnabled,
    SettingsField::AutosaveInterval,
    SettingsField::SidebarWidth,
    SettingsField::DefaultFolder,
    SettingsField::DailyFolder,
    SettingsField::ShowTemplates,
];

const LAYOUTS: [Layout; 3] = [Layout::Edit, Layout::Preview, Layout::Split];

impl SettingsField {
    pub fn label(self) -> &'static str {
        match self {
            SettingsField::DarkMode => "Dark mode",
            SettingsField::DefaultView => "Default view",
            SettingsField::AutosaveEnabled => "Autosave",
            SettingsField::AutosaveInterval => "Autosave every (s)",
            SettingsField::SidebarWidth => "Sidebar width",
            SettingsField::DefaultFolder => "Default folder",
            SettingsField::DailyFolder => "Daily folder",
            SettingsField::ShowTemplates => "Show templates",
        }
    }

    pub fn value(self, settings: &Settings) -> String {
        match self {
            SettingsField::DarkMode => on_off(settings.dark_mode).to_string(),
            SettingsField::DefaultView => settings.default_view.as_str().to_string(),
            SettingsField::AutosaveEnabled => on_off(settings.autosave_enabled).to_string(),
            SettingsField::AutosaveInterval => settings.autosave_interval_seconds.to_string(),
            SettingsField::SidebarWidth => settings.sidebar_width.to_string(),
            SettingsField::DefaultFolder => settings.default_folder.clone(),
            SettingsField::DailyFolder => settings.daily_folder.clone(),
            SettingsField::ShowTemplates => on_off(settings.show_templates).to_string(),
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            SettingsField::DefaultFolder => "(root)",
            SettingsField::DailyFolder => "(off)",
            _ => "",
        }
    }

    fn number(self, settings: &mut Settings) -> Option<&mut u32> {
        match self {
            SettingsField::AutosaveInterval => Some(&mut settings.autosave_interval_seconds),
            SettingsField::SidebarWidth => Some(&mut settings.sidebar_width),
            _ => None,
        }
    }

    fn text(self, settings: &mut Settings) -> Option<&mut String> {
        match self {
            SettingsField::DefaultFolder => Some(&mut settings.default_folder),
            SettingsField::DailyFolder => Some(&mut settings.daily_folder),
            _ => None,
        }
    }

    pub fn push_char(self, settings: &mut Settings, c: char) {
        if c == ' ' && self.adjust(settings, 1) {
            return;
        }
        if let Some(text) = self.text(settings) {
            text.push(c);
        } else if let Some(n) = self.number(settings)
            && let Some(d) = c.to_digit(10)
        {
            *n = n.saturating_mul(10).saturating_add(d).min(MAX_NUMBER_FIELD);
        }
    }

    pub fn pop_char(self, settings: &mut Settings) {
        if let Some(text) = self.text(settings) {
            text.pop();
        } else if let Some(n) = self.number(settings) {
            *n /= 10;
        }
    }

    /// Toggle, cycle or step the field. Returns false for text fields.
    pub fn adjust(self, settings: &mut Settings, delta: i64) -> bool {
        match self {
            SettingsField::DarkMode => settings.dark_mode = !settings.dark_mode,
            SettingsField::AutosaveEnabled => {
                settings.autosave_enabled = !settings.autosave_enabled
            }
            SettingsField::ShowTemplates => settings.show_templates = !settings.show_templates,
            SettingsField::DefaultView => {
                let idx = LAYOUTS
                    .iter()
                    .position(|l| *l == settings.default_view)
                    .unwrap_or(0) as i64;
                let next = (idx + delta).rem_euclid(LAYOUTS.len() as i64) as usize;
                settings.default_view = LAYOUTS[next];
            }
            SettingsField::AutosaveInterval => step(&mut settings.autosave_interval_seconds, delta * 5),
            SettingsField::SidebarWidth => step(&mut settings.sidebar_width, delta * 10),
            SettingsField::DefaultFolder | SettingsField::DailyFolder => return false,
        }
        true
    }
}

fn step(n: &mut u32, delta: i64) {
    let next = (i64::from(*n) + delta).clamp(0, i64::from(MAX_NUMBER_FIELD));
    *n = u32::try_from(next).unwrap_or(0);
}
