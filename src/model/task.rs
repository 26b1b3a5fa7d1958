use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;
/// Priority given to new drafts
pub const DEFAULT_PRIORITY: u8 = 3;

/// Calendar format for due dates on the wire
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A task as stored in `tasks.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    /// Empty string means "no project"
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default, rename = "duedate", with = "due_date_serde")]
    pub due_date: Option<NaiveDate>,
    pub priority: u8,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
    /// Set for tasks synced from a bullet line in a note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TaskSource>,
}

/// Where a note-synced task came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSource {
    pub note_path: String,
    /// 1-based
    pub line_number: usize,
    /// Hex SHA-256 of the raw line
    pub line_hash: String,
}

impl TaskRecord {
    /// The project string as stored, if it is not blank. Grouping keys on
    /// the exact string, so surrounding spaces are kept.
    pub fn project_name(&self) -> Option<&str> {
        (!self.project.trim().is_empty()).then_some(self.project.as_str())
    }
}

/// Editable form of a task. Fields hold raw user input until validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `YYYY-MM-DD` or empty
    #[serde(default, rename = "duedate")]
    pub due_date: String,
    pub priority: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        TaskDraft {
            title: String::new(),
            project: String::new(),
            tags: Vec::new(),
            due_date: String::new(),
            priority: i64::from(DEFAULT_PRIORITY),
            completed: false,
            notes: String::new(),
        }
    }
}

impl From<&TaskRecord> for TaskDraft {
    fn from(task: &TaskRecord) -> Self {
        TaskDraft {
            title: task.title.clone(),
            project: task.project.clone(),
            tags: task.tags.clone(),
            due_date: task
                .due_date
                .map(|d| d.format(DUE_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            priority: i64::from(task.priority),
            completed: task.completed,
            notes: task.notes.clone(),
        }
    }
}

/// A draft that passed validation, with normalized fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTask {
    pub title: String,
    pub project: String,
    pub tags: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: u8,
    pub completed: bool,
    pub notes: String,
}

impl TaskDraft {
    /// A blank draft, optionally pre-assigned to a project.
    pub fn for_project(project: Option<&str>) -> Self {
        TaskDraft {
            project: project.unwrap_or_default().to_string(),
            ..TaskDraft::default()
        }
    }

    /// Check required fields and normalize whitespace.
    ///
    /// Title must be non-blank, priority in 1..=5, due date empty or
    /// `YYYY-MM-DD`. Blank tags are dropped.
    pub fn validate(&self) -> Result<ValidTask, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        let priority = u8::try_from(self.priority)
            .ok()
            .filter(|p| (MIN_PRIORITY..=MAX_PRIORITY).contains(p))
            .ok_or(ValidationError::PriorityOutOfRange(self.priority))?;
        let due = self.due_date.trim();
        let due_date = if due.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(due, DUE_DATE_FORMAT)
                    .map_err(|_| ValidationError::InvalidDueDate(due.to_string()))?,
            )
        };
        Ok(ValidTask {
            title: title.to_string(),
            project: self.project.trim().to_string(),
            tags: normalize_tags(&self.tags),
            due_date,
            priority,
            completed: self.completed,
            notes: self.notes.clone(),
        })
    }
}

/// Trim tags and drop empty ones, preserving order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Due dates are `""` on the wire when unset.
mod due_date_serde {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DUE_DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(DUE_DATE_FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    /// Unparseable dates load as "no due date" rather than failing the whole file.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s, DUE_DATE_FORMAT).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, priority: i64, due: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            priority,
            due_date: due.into(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn validate_requires_title() {
        assert_eq!(
            draft("   ", 3, "").validate(),
            Err(ValidationError::TitleRequired)
        );
    }

    #[test]
    fn validate_priority_range() {
        assert_eq!(
            draft("x", 0, "").validate(),
            Err(ValidationError::PriorityOutOfRange(0))
        );
        assert_eq!(
            draft("x", 6, "").validate(),
            Err(ValidationError::PriorityOutOfRange(6))
        );
        assert!(draft("x", 5, "").validate().is_ok());
    }

    #[test]
    fn validate_due_date() {
        assert!(matches!(
            draft("x", 3, "next week").validate(),
            Err(ValidationError::InvalidDueDate(_))
        ));
        let ok = draft("x", 3, " 2024-02-01 ").validate().unwrap();
        assert_eq!(ok.due_date, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn validate_normalizes() {
        let mut d = draft("  Call bank ", 2, "");
        d.project = "  home ".into();
        d.tags = vec![" money ".into(), "".into(), "  ".into()];
        let v = d.validate().unwrap();
        assert_eq!(v.title, "Call bank");
        assert_eq!(v.project, "home");
        assert_eq!(v.tags, vec!["money"]);
    }

    #[test]
    fn record_wire_format() {
        let json = r#"{
            "id": "t1", "title": "Ship", "project": "", "tags": ["work"],
            "created": "2024-01-01T00:00:00Z", "updated": "2024-01-02T00:00:00Z",
            "duedate": "", "priority": 4, "completed": false, "notes": "",
            "recurring": null
        }"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.due_date, None);
        assert_eq!(task.project_name(), None);

        let out = serde_json::to_value(&task).unwrap();
        assert_eq!(out["duedate"], "");
        assert_eq!(out["priority"], 4);
    }

    #[test]
    fn draft_from_record_round_trips_due_date() {
        let task = TaskRecord {
            id: "t".into(),
            title: "T".into(),
            project: "p".into(),
            tags: vec![],
            created: Utc::now(),
            updated: Utc::now(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 9),
            priority: 2,
            completed: true,
            notes: "n".into(),
            source: None,
        };
        let d = TaskDraft::from(&task);
        assert_eq!(d.due_date, "2024-03-09");
        assert_eq!(d.priority, 2);
        assert!(d.completed);
    }
}
