use serde::Serialize;

use crate::model::{SearchMatch, Settings, TagGroup, TaskRecord, TreeNode};
use crate::ops::index::{Summary, TaskScope};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskGroupJson {
    pub group: String,
    pub tasks: Vec<TaskRecord>,
}

#[derive(Serialize)]
pub struct SummaryJson {
    pub group: String,
    #[serde(flatten)]
    pub counts: Summary,
}

#[derive(Serialize)]
pub struct NoteHtmlJson {
    pub path: String,
    pub html: String,
}

#[derive(Serialize)]
pub struct ConfigValueJson {
    pub key: String,
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_groups_to_json(groups: &[(TaskScope, Vec<TaskRecord>)]) -> Vec<TaskGroupJson> {
    groups
        .iter()
        .map(|(scope, tasks)| TaskGroupJson {
            group: scope.label().to_string(),
            tasks: tasks.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Indented file tree. Folders end with `/`.
pub fn format_tree(node: &TreeNode) -> Vec<String> {
    let mut lines = Vec::new();
    push_tree(node, 0, &mut lines);
    lines
}

fn push_tree(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let prefix = "  ".repeat(depth);
    match node {
        TreeNode::Folder { name, children, .. } => {
            lines.push(format!("{}{}/", prefix, name));
            for child in children {
                push_tree(child, depth + 1, lines);
            }
        }
        leaf => lines.push(format!("{}{}", prefix, leaf.name())),
    }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &TaskRecord) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let mut line = format!("[{}] {}", check, task.title);
    if !task.tags.is_empty() {
        line.push(' ');
        line.push_str(
            &task
                .tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }
    line.push_str(&format!("  p{}", task.priority));
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", due));
    }
    line
}

/// Task groups with a header line each, separated by blank lines
pub fn format_task_groups(groups: &[(TaskScope, Vec<TaskRecord>)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (scope, tasks)) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("== {} ==", scope.label()));
        lines.extend(tasks.iter().map(|t| format!("  {}", format_task_line(t))));
    }
    lines
}

pub fn format_tags(groups: &[TagGroup]) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        lines.push(format!("#{} ({})", group.tag, group.notes.len()));
        lines.extend(group.notes.iter().map(|n| format!("  {}", n.path)));
    }
    lines
}

pub fn format_search_match(m: &SearchMatch) -> String {
    match m {
        SearchMatch::Note { path, .. } => format!("note  {}", path),
        SearchMatch::Task { id, name } => format!("task  {}  {}", name, id),
    }
}

/// `key = value` lines using the names `quill settings KEY VALUE` accepts
pub fn format_settings(settings: &Settings) -> Vec<String> {
    vec![
        format!("darkMode = {}", settings.dark_mode),
        format!("defaultView = {}", settings.default_view.as_str()),
        format!("autosaveEnabled = {}", settings.autosave_enabled),
        format!(
            "autosaveIntervalSeconds = {}",
            settings.autosave_interval_seconds
        ),
        format!("sidebarWidth = {}", settings.sidebar_width),
        format!("defaultFolder = {}", settings.default_folder),
        format!("dailyFolder = {}", settings.daily_folder),
        format!("showTemplates = {}", settings.show_templates),
    ]
}

pub fn format_summary(title: &str, summary: &Summary) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    lines.extend(summary.describe().into_iter().map(|row| format!("  {}", row)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, NoteRef};
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn task(title: &str) -> TaskRecord {
        let ts = Utc.timestamp_opt(0, 0).unwrap();
        TaskRecord {
            id: "t1".into(),
            title: title.into(),
            project: String::new(),
            tags: vec!["home".into()],
            created: ts,
            updated: ts,
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            priority: 2,
            completed: false,
            notes: String::new(),
            source: None,
        }
    }

    #[test]
    fn tree_is_indented() {
        let tree = TreeNode::folder(
            "Notes",
            "",
            vec![
                TreeNode::folder(
                    "work",
                    "work",
                    vec![TreeNode::leaf(NodeKind::Note, "plan.md", "work/plan.md")],
                ),
                TreeNode::leaf(NodeKind::Csv, "data.csv", "data.csv"),
            ],
        );
        assert_eq!(
            format_tree(&tree),
            vec!["Notes/", "  work/", "    plan.md", "  data.csv"]
        );
    }

    #[test]
    fn task_line_shows_tags_priority_and_due() {
        assert_eq!(
            format_task_line(&task("Fix sink")),
            "[ ] Fix sink #home  p2  due 2024-05-01"
        );
    }

    #[test]
    fn groups_get_headers() {
        let groups = vec![
            (TaskScope::Project("home".into()), vec![task("A")]),
            (TaskScope::NoProject, vec![task("B")]),
        ];
        let lines = format_task_groups(&groups);
        assert_eq!(lines[0], "== home ==");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "== No Project ==");
    }

    #[test]
    fn tags_list_their_notes() {
        let groups = vec![TagGroup {
            tag: "idea".into(),
            notes: vec![NoteRef {
                path: "a/b.md".into(),
                name: "b.md".into(),
            }],
        }];
        assert_eq!(format_tags(&groups), vec!["#idea (1)", "  a/b.md"]);
    }

    #[test]
    fn settings_use_wire_names() {
        let lines = format_settings(&Settings::default());
        assert_eq!(lines[0], "darkMode = false");
        assert_eq!(lines[1], "defaultView = split");
        assert_eq!(lines[4], "sidebarWidth = 300");
    }
}
