use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::model::config::LogConfig;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "QUILL_LOG";

/// Where log lines go for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to the configured log file. The TUI owns the terminal, so
    /// nothing may be written to stdout or stderr.
    File,
    /// Write to stderr, only when `QUILL_LOG` is set.
    Stderr,
}

fn filter_for(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Failure to open the log file disables
/// logging rather than aborting startup.
pub fn init(notes_dir: &Path, config: &LogConfig, target: LogTarget) {
    match target {
        LogTarget::Stderr => {
            if std::env::var_os(LOG_ENV).is_none() {
                return;
            }
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter_for(config))
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
        }
        LogTarget::File => {
            let path = notes_dir.join(&config.file);
            if let Some(parent) = path.parent()
                && fs::create_dir_all(parent).is_err()
            {
                return;
            }
            let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
                return;
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter_for(config))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
    }
}
