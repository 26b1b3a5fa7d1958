use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::state::client_dir;
use crate::model::config::ClientConfig;

const CONFIG_FILE: &str = "config.toml";

/// Error type for local config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

pub fn config_path(notes_dir: &Path) -> PathBuf {
    client_dir(notes_dir).join(CONFIG_FILE)
}

/// Read the config and the raw document for round-trip-safe editing.
/// A missing file reads as defaults and an empty document.
pub fn read_config(notes_dir: &Path) -> Result<(ClientConfig, toml_edit::DocumentMut), ConfigError> {
    let path = config_path(notes_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    let config: ClientConfig = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Config only; convenience for callers that never edit.
pub fn load_config(notes_dir: &Path) -> Result<ClientConfig, ConfigError> {
    read_config(notes_dir).map(|(config, _)| config)
}

/// Write the document back, preserving formatting and comments.
pub fn write_config(notes_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let dir = client_dir(notes_dir);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(CONFIG_FILE), doc.to_string())?;
    Ok(())
}

/// Look up a dotted key such as `ui.show_key_hints`.
pub fn get_value(doc: &toml_edit::DocumentMut, key: &str) -> Option<String> {
    let mut item = doc.as_item();
    for part in key.split('.') {
        item = item.get(part)?;
    }
    match item {
        toml_edit::Item::Value(toml_edit::Value::String(s)) => Some(s.value().clone()),
        toml_edit::Item::Value(v) => Some(v.to_string().trim().to_string()),
        toml_edit::Item::Table(t) => Some(t.to_string().trim_end().to_string()),
        _ => None,
    }
}

/// Set a dotted key. Values that parse as TOML (booleans, numbers, arrays)
/// keep their type; anything else is stored as a string.
///
/// The edited document must still deserialize as a [`ClientConfig`].
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, raw: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    let Some((last, tables)) = parts.split_last() else {
        return Err(ConfigError::UnknownKey(key.to_string()));
    };

    let value: toml_edit::Value = raw
        .parse()
        .unwrap_or_else(|_| toml_edit::Value::from(raw));

    let mut table = doc.as_table_mut();
    for part in tables {
        if !table.contains_key(part) {
            table.insert(part, toml_edit::Item::Table(toml_edit::Table::new()));
        }
        table = table
            .get_mut(part)
            .and_then(toml_edit::Item::as_table_mut)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    }
    table.insert(last, toml_edit::value(value));

    toml::from_str::<ClientConfig>(&doc.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r##"# local preferences
[ui]
show_key_hints = true  # toggled often

[ui.colors]
highlight = "#FF00AA"
"##;

    #[test]
    fn missing_file_reads_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, doc) = read_config(tmp.path()).unwrap();
        assert!(config.ui.show_key_hints);
        assert!(doc.to_string().is_empty());
    }

    #[test]
    fn round_trip_preserves_comments() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(client_dir(tmp.path())).unwrap();
        fs::write(config_path(tmp.path()), SAMPLE).unwrap();

        let (_config, doc) = read_config(tmp.path()).unwrap();
        write_config(tmp.path(), &doc).unwrap();
        assert_eq!(fs::read_to_string(config_path(tmp.path())).unwrap(), SAMPLE);
    }

    #[test]
    fn set_keeps_types_and_comments() {
        let mut doc: toml_edit::DocumentMut = SAMPLE.parse().unwrap();
        set_value(&mut doc, "ui.show_key_hints", "false").unwrap();
        set_value(&mut doc, "log.level", "debug").unwrap();
        set_value(&mut doc, "store.sync_note_tasks", "true").unwrap();

        let text = doc.to_string();
        assert!(text.starts_with("# local preferences"));
        let config: ClientConfig = toml::from_str(&text).unwrap();
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.log.level, "debug");
        assert!(config.store.sync_note_tasks);
        assert_eq!(get_value(&doc, "log.level").as_deref(), Some("debug"));
        assert_eq!(get_value(&doc, "ui.colors.highlight").as_deref(), Some("#FF00AA"));
        assert_eq!(get_value(&doc, "ui.nope"), None);
    }

    #[test]
    fn set_rejects_wrong_type() {
        let mut doc: toml_edit::DocumentMut = SAMPLE.parse().unwrap();
        assert!(matches!(
            set_value(&mut doc, "ui.show_key_hints", "sometimes"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
