use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Client-side configuration from `.quill/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Turn `* ` bullet lines in notes into tasks on save
    #[serde(default)]
    pub sync_note_tasks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Theme slot name → `#RRGGBB`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Replaces the built-in tag palette when non-empty
    #[serde(default)]
    pub tag_palette: Vec<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
            tag_palette: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, overridden by `QUILL_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file, relative to the notes directory
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    ".quill/quill.log".to_string()
}
