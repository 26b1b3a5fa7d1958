use std::sync::LazyLock;

use chrono::NaiveDate;
use indexmap::IndexSet;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::model::{DEFAULT_PRIORITY, DUE_DATE_FORMAT};

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\*\s+").unwrap());
static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\+([A-Za-z0-9][A-Za-z0-9_-]*)\b").unwrap());
static DUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)>(\d{4}-\d{2}-\d{2})\b").unwrap());
static PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)-([1-5])\b").unwrap());
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([A-Za-z]+)\b").unwrap());

/// A `* ...` bullet line in a note, read as a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTaskLine {
    /// 1-based
    pub line_number: usize,
    pub line_hash: String,
    /// Everything after the bullet, markers included
    pub title: String,
    pub project: String,
    pub due_date: Option<NaiveDate>,
    pub priority: u8,
    /// Lowercased, deduplicated
    pub tags: Vec<String>,
}

/// Find task lines in note content.
pub fn parse_task_lines(content: &str) -> Vec<NoteTaskLine> {
    content
        .split('\n')
        .enumerate()
        .filter_map(|(idx, line)| {
            let raw = line.strip_suffix('\r').unwrap_or(line);
            let bullet = BULLET_RE.find(raw)?;
            let rest = &raw[bullet.end()..];
            if rest.trim().is_empty() {
                return None;
            }
            Some(NoteTaskLine {
                line_number: idx + 1,
                line_hash: hash_line(raw),
                title: rest.to_string(),
                project: PROJECT_RE
                    .captures(rest)
                    .map(|c| c[1].to_string())
                    .unwrap_or_default(),
                due_date: DUE_RE
                    .captures(rest)
                    .and_then(|c| NaiveDate::parse_from_str(&c[1], DUE_DATE_FORMAT).ok()),
                priority: PRIORITY_RE
                    .captures(rest)
                    .and_then(|c| c[1].parse().ok())
                    .unwrap_or(DEFAULT_PRIORITY),
                tags: line_tags(rest),
            })
        })
        .collect()
}

fn line_tags(text: &str) -> Vec<String> {
    let tags: IndexSet<String> = TAG_RE
        .captures_iter(text)
        .map(|c| c[1].to_lowercase())
        .collect();
    tags.into_iter().collect()
}

/// Hex SHA-256 of a raw line.
pub fn hash_line(line: &str) -> String {
    hex::encode(Sha256::digest(line.as_bytes()))
}
