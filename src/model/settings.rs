use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use super::ValidationError;
use crate::util::path::clean_rel_path;

/// Current settings file version
pub const SETTINGS_VERSION: u32 = 2;
/// Autosave never fires more often than this
pub const MIN_AUTOSAVE_SECONDS: u32 = 5;
pub const DEFAULT_AUTOSAVE_SECONDS: u32 = 30;
pub const MIN_SIDEBAR_WIDTH: u32 = 220;
pub const MAX_SIDEBAR_WIDTH: u32 = 600;
pub const DEFAULT_SIDEBAR_WIDTH: u32 = 300;

/// How a note is laid out: raw text, rendered preview, or both side by side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Edit,
    Preview,
    #[default]
    Split,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Edit => "edit",
            Layout::Preview => "preview",
            Layout::Split => "split",
        }
    }

    pub fn shows_editor(self) -> bool {
        matches!(self, Layout::Edit | Layout::Split)
    }

    pub fn shows_preview(self) -> bool {
        matches!(self, Layout::Preview | Layout::Split)
    }
}

impl FromStr for Layout {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(Layout::Edit),
            "preview" => Ok(Layout::Preview),
            "split" => Ok(Layout::Split),
            other => Err(ValidationError::InvalidLayout(other.to_string())),
        }
    }
}

/// Empty or unknown layouts in the file fall back to the default.
fn lenient_layout<'de, D: Deserializer<'de>>(d: D) -> Result<Layout, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

/// Workspace settings as persisted by the store (`settings.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub version: u32,
    pub dark_mode: bool,
    #[serde(deserialize_with = "lenient_layout")]
    pub default_view: Layout,
    pub autosave_enabled: bool,
    pub autosave_interval_seconds: u32,
    pub sidebar_width: u32,
    pub default_folder: String,
    pub daily_folder: String,
    pub show_templates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SETTINGS_VERSION,
            dark_mode: false,
            default_view: Layout::Split,
            autosave_enabled: false,
            autosave_interval_seconds: DEFAULT_AUTOSAVE_SECONDS,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            default_folder: String::new(),
            daily_folder: String::new(),
            show_templates: true,
        }
    }
}

impl Settings {
    /// Fill zero values with defaults and migrate older files.
    pub fn normalized(mut self) -> Self {
        if self.version == 0 {
            self.version = SETTINGS_VERSION;
        }
        if self.autosave_interval_seconds == 0 {
            self.autosave_interval_seconds = DEFAULT_AUTOSAVE_SECONDS;
        }
        if self.sidebar_width == 0 {
            self.sidebar_width = DEFAULT_SIDEBAR_WIDTH;
        }
        if self.default_folder == "." {
            self.default_folder.clear();
        }
        if self.daily_folder == "." {
            self.daily_folder.clear();
        }
        if self.version < SETTINGS_VERSION {
            self.show_templates = true;
            self.version = SETTINGS_VERSION;
        }
        self
    }

    /// Autosave period with the 5 second floor applied.
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(u64::from(
            self.autosave_interval_seconds.max(MIN_AUTOSAVE_SECONDS),
        ))
    }

    /// Apply a patch, returning the names of the fields it touched.
    pub fn apply(&mut self, patch: &SettingsPatch) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if let Some(v) = patch.dark_mode {
            self.dark_mode = v;
            changed.push("darkMode");
        }
        if let Some(v) = patch.default_view {
            self.default_view = v;
            changed.push("defaultView");
        }
        if let Some(v) = patch.autosave_enabled {
            self.autosave_enabled = v;
            changed.push("autosaveEnabled");
        }
        if let Some(v) = patch.autosave_interval_seconds {
            self.autosave_interval_seconds = v;
            changed.push("autosaveIntervalSeconds");
        }
        if let Some(v) = patch.sidebar_width {
            self.sidebar_width = v;
            changed.push("sidebarWidth");
        }
        if let Some(v) = &patch.default_folder {
            self.default_folder = v.clone();
            changed.push("defaultFolder");
        }
        if let Some(v) = &patch.daily_folder {
            self.daily_folder = v.clone();
            changed.push("dailyFolder");
        }
        if let Some(v) = patch.show_templates {
            self.show_templates = v;
            changed.push("showTemplates");
        }
        changed
    }

    /// The patch that turns `self` into `edited`. Only differing fields are set.
    pub fn diff(&self, edited: &Settings) -> SettingsPatch {
        fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
            (a != b).then(|| b.clone())
        }
        SettingsPatch {
            dark_mode: changed(&self.dark_mode, &edited.dark_mode),
            default_view: changed(&self.default_view, &edited.default_view),
            autosave_enabled: changed(&self.autosave_enabled, &edited.autosave_enabled),
            autosave_interval_seconds: changed(
                &self.autosave_interval_seconds,
                &edited.autosave_interval_seconds,
            ),
            sidebar_width: changed(&self.sidebar_width, &edited.sidebar_width),
            default_folder: changed(&self.default_folder, &edited.default_folder),
            daily_folder: changed(&self.daily_folder, &edited.daily_folder),
            show_templates: changed(&self.show_templates, &edited.show_templates),
        }
    }
}

/// A partial settings update. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_view: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autosave_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autosave_interval_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_templates: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    /// Check ranges and clean folder paths.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if let Some(secs) = self.autosave_interval_seconds
            && secs < MIN_AUTOSAVE_SECONDS
        {
            return Err(ValidationError::AutosaveIntervalTooShort(secs));
        }
        if let Some(width) = self.sidebar_width
            && !(MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH).contains(&width)
        {
            return Err(ValidationError::SidebarWidthOutOfRange(width));
        }
        if let Some(folder) = self.default_folder.take() {
            self.default_folder = Some(clean_rel_path(&folder)?);
        }
        if let Some(folder) = self.daily_folder.take() {
            self.daily_folder = Some(clean_rel_path(&folder)?);
        }
        Ok(self)
    }

    /// Set a single field from its wire name and a string value (CLI use).
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        fn flag(key: &str, value: &str) -> Result<bool, ValidationError> {
            match value {
                "true" | "on" | "yes" | "1" => Ok(true),
                "false" | "off" | "no" | "0" => Ok(false),
                _ => Err(ValidationError::InvalidSetting(format!(
                    "{key} expects true or false"
                ))),
            }
        }
        fn number(key: &str, value: &str) -> Result<u32, ValidationError> {
            value
                .parse()
                .map_err(|_| ValidationError::InvalidSetting(format!("{key} expects a number")))
        }
        match key {
            "darkMode" => self.dark_mode = Some(flag(key, value)?),
            "defaultView" => self.default_view = Some(value.parse()?),
            "autosaveEnabled" => self.autosave_enabled = Some(flag(key, value)?),
            "autosaveIntervalSeconds" => {
                self.autosave_interval_seconds = Some(number(key, value)?)
            }
            "sidebarWidth" => self.sidebar_width = Some(number(key, value)?),
            "defaultFolder" => self.default_folder = Some(value.to_string()),
            "dailyFolder" => self.daily_folder = Some(value.to_string()),
            "showTemplates" => self.show_templates = Some(flag(key, value)?),
            other => {
                return Err(ValidationError::InvalidSetting(format!(
                    "unknown setting: {other}"
                )));
            }
        }
        Ok(())
    }
}
