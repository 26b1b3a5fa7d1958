//! Derived, display-ready view over the store's tree, tasks and tags.
//!
//! The index is rebuilt wholesale from fresh snapshots; nothing here holds
//! state between builds.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{EntityRef, NodeKind, TagGroup, TaskRecord, TreeNode};
use crate::ops::task_order::sort_tasks;

/// Which slice of the task list a group holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "scope", content = "project", rename_all = "snake_case")]
pub enum TaskScope {
    /// The whole Tasks section
    All,
    Project(String),
    NoProject,
    Completed,
}

impl TaskScope {
    pub fn label(&self) -> &str {
        match self {
            TaskScope::All => "Tasks",
            TaskScope::Project(name) => name,
            TaskScope::NoProject => "No Project",
            TaskScope::Completed => "Completed",
        }
    }

    /// Project to prefill when creating a task from this group.
    pub fn project(&self) -> Option<&str> {
        match self {
            TaskScope::Project(name) => Some(name),
            _ => None,
        }
    }

    fn key(&self) -> String {
        match self {
            TaskScope::All => "tasks".to_string(),
            TaskScope::Project(name) => format!("tasks/project:{}", name),
            TaskScope::NoProject => "tasks/none".to_string(),
            TaskScope::Completed => "tasks/completed".to_string(),
        }
    }
}

/// One node of the derived forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndexNode {
    Folder {
        name: String,
        path: String,
        children: Vec<IndexNode>,
    },
    Note {
        name: String,
        path: String,
    },
    Asset {
        name: String,
        path: String,
    },
    Pdf {
        name: String,
        path: String,
    },
    Csv {
        name: String,
        path: String,
    },
    TaskGroup {
        scope: TaskScope,
        children: Vec<IndexNode>,
    },
    Task(TaskRecord),
    /// The Tags section
    TagGroup { children: Vec<IndexNode> },
    /// One tag; children are the notes containing it
    Tag { name: String, children: Vec<IndexNode> },
}

/// A group node that can be shown in summary mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum GroupRef {
    Folder(String),
    Tasks(TaskScope),
    Tags,
    Tag(String),
}

/// What a summary view offers to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateScope {
    /// A note or folder inside this folder
    Note { folder: String },
    Task { project: Option<String> },
    Nothing,
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileCounts {
    pub folders: usize,
    pub notes: usize,
    pub assets: usize,
    pub pdfs: usize,
    pub csvs: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Distinct non-blank project names
    pub projects: usize,
    pub no_project: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagCounts {
    pub tags: usize,
    /// Distinct notes across the counted tags
    pub notes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Summary {
    Files(FileCounts),
    Tasks(TaskCounts),
    Tags(TagCounts),
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

impl Summary {
    /// Count rows, most significant first.
    pub fn describe(&self) -> Vec<String> {
        match self {
            Summary::Files(c) => vec![
                plural(c.folders, "folder", "folders"),
                plural(c.notes, "note", "notes"),
                plural(c.assets, "image", "images"),
                plural(c.pdfs, "PDF", "PDFs"),
                plural(c.csvs, "CSV file", "CSV files"),
            ],
            Summary::Tasks(c) => vec![
                plural(c.total, "task", "tasks"),
                format!("{} active", c.active),
                format!("{} completed", c.completed),
                plural(c.projects, "project", "projects"),
                format!("{} without a project", c.no_project),
            ],
            Summary::Tags(c) => vec![
                plural(c.tags, "tag", "tags"),
                plural(c.notes, "tagged note", "tagged notes"),
            ],
        }
    }
}

impl IndexNode {
    fn leaf(kind: NodeKind, name: &str, path: &str) -> IndexNode {
        let (name, path) = (name.to_string(), path.to_string());
        match kind {
            NodeKind::Folder => IndexNode::Folder {
                name,
                path,
                children: Vec::new(),
            },
            NodeKind::Note => IndexNode::Note { name, path },
            NodeKind::Asset => IndexNode::Asset { name, path },
            NodeKind::Pdf => IndexNode::Pdf { name, path },
            NodeKind::Csv => IndexNode::Csv { name, path },
        }
    }

    fn from_tree(node: &TreeNode) -> IndexNode {
        match node {
            TreeNode::Folder {
                name,
                path,
                children,
            } => IndexNode::Folder {
                name: name.clone(),
                path: path.clone(),
                children: children.iter().map(IndexNode::from_tree).collect(),
            },
            leaf => IndexNode::leaf(leaf.kind(), leaf.name(), leaf.path()),
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            IndexNode::Folder { name, .. }
            | IndexNode::Note { name, .. }
            | IndexNode::Asset { name, .. }
            | IndexNode::Pdf { name, .. }
            | IndexNode::Csv { name, .. }
            | IndexNode::Tag { name, .. } => name,
            IndexNode::TaskGroup { scope, .. } => scope.label(),
            IndexNode::Task(task) => &task.title,
            IndexNode::TagGroup { .. } => "Tags",
        }
    }

    pub fn children(&self) -> &[IndexNode] {
        match self {
            IndexNode::Folder { children, .. }
            | IndexNode::TaskGroup { children, .. }
            | IndexNode::TagGroup { children }
            | IndexNode::Tag { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        self.group_ref().is_some()
    }

    /// Key that is unique among siblings and stable across rebuilds.
    pub fn key(&self) -> String {
        match self {
            IndexNode::Folder { path, .. } => format!("folder:{}", path),
            IndexNode::Note { path, .. }
            | IndexNode::Asset { path, .. }
            | IndexNode::Pdf { path, .. }
            | IndexNode::Csv { path, .. } => format!("file:{}", path),
            IndexNode::TaskGroup { scope, .. } => scope.key(),
            IndexNode::Task(task) => format!("task:{}", task.id),
            IndexNode::TagGroup { .. } => "tags".to_string(),
            IndexNode::Tag { name, .. } => format!("tag:{}", name),
        }
    }

    /// The entity a leaf opens, if any.
    pub fn entity(&self) -> Option<EntityRef> {
        match self {
            IndexNode::Note { path, .. }
            | IndexNode::Asset { path, .. }
            | IndexNode::Pdf { path, .. }
            | IndexNode::Csv { path, .. } => Some(EntityRef::path(path.as_str())),
            IndexNode::Task(task) => Some(EntityRef::task(task.id.as_str())),
            _ => None,
        }
    }

    pub fn group_ref(&self) -> Option<GroupRef> {
        match self {
            IndexNode::Folder { path, .. } => Some(GroupRef::Folder(path.clone())),
            IndexNode::TaskGroup { scope, .. } => Some(GroupRef::Tasks(scope.clone())),
            IndexNode::TagGroup { .. } => Some(GroupRef::Tags),
            IndexNode::Tag { name, .. } => Some(GroupRef::Tag(name.clone())),
            _ => None,
        }
    }

    /// Aggregate counts for a group node. Leaves have none.
    pub fn summary(&self) -> Option<Summary> {
        match self {
            IndexNode::Folder { children, .. } => {
                let mut counts = FileCounts::default();
                count_files(children, &mut counts);
                Some(Summary::Files(counts))
            }
            IndexNode::TaskGroup { children, .. } => {
                let mut tasks = Vec::new();
                collect_tasks(children, &mut tasks);
                Some(Summary::Tasks(count_tasks(&tasks)))
            }
            IndexNode::TagGroup { children } => Some(Summary::Tags(count_tags(children))),
            IndexNode::Tag { .. } => Some(Summary::Tags(count_tags(std::slice::from_ref(self)))),
            _ => None,
        }
    }

    /// What "create new" means inside this group.
    pub fn create_scope(&self) -> CreateScope {
        match self {
            IndexNode::Folder { path, .. } => CreateScope::Note {
                folder: path.clone(),
            },
            IndexNode::TaskGroup { scope, .. } => CreateScope::Task {
                project: scope.project().map(str::to_string),
            },
            _ => CreateScope::Nothing,
        }
    }

    fn find_group(&self, target: &GroupRef) -> Option<&IndexNode> {
        if self.group_ref().as_ref() == Some(target) {
            return Some(self);
        }
        self.children()
            .iter()
            .filter(|c| c.is_group())
            .find_map(|c| c.find_group(target))
    }
}

fn count_files(nodes: &[IndexNode], counts: &mut FileCounts) {
    for node in nodes {
        match node {
            IndexNode::Folder { children, .. } => {
                counts.folders += 1;
                count_files(children, counts);
            }
            IndexNode::Note { .. } => counts.notes += 1,
            IndexNode::Asset { .. } => counts.assets += 1,
            IndexNode::Pdf { .. } => counts.pdfs += 1,
            IndexNode::Csv { .. } => counts.csvs += 1,
            _ => {}
        }
    }
}

fn collect_tasks<'a>(nodes: &'a [IndexNode], out: &mut Vec<&'a TaskRecord>) {
    for node in nodes {
        match node {
            IndexNode::Task(task) => out.push(task),
            other => collect_tasks(other.children(), out),
        }
    }
}

fn count_tasks(tasks: &[&TaskRecord]) -> TaskCounts {
    let completed = tasks.iter().filter(|t| t.completed).count();
    let mut projects: Vec<&str> = tasks.iter().filter_map(|t| t.project_name()).collect();
    projects.sort_unstable();
    projects.dedup();
    TaskCounts {
        total: tasks.len(),
        completed,
        active: tasks.len() - completed,
        projects: projects.len(),
        no_project: tasks.iter().filter(|t| t.project_name().is_none()).count(),
    }
}

fn count_tags(tags: &[IndexNode]) -> TagCounts {
    let mut notes: Vec<&str> = tags
        .iter()
        .flat_map(|tag| tag.children())
        .filter_map(|note| match note {
            IndexNode::Note { path, .. } => Some(path.as_str()),
            _ => None,
        })
        .collect();
    notes.sort_unstable();
    notes.dedup();
    TagCounts {
        tags: tags.len(),
        notes: notes.len(),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// The three-section forest: file tree, Tasks, Tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentIndex {
    pub sections: Vec<IndexNode>,
}

impl ContentIndex {
    /// Build the forest from raw snapshots.
    ///
    /// No tree means no forest: tasks and tags are only shown alongside a
    /// loaded tree. A loaded root with no children is still a tree, so an
    /// empty notes directory keeps its Tasks and Tags sections.
    pub fn build(tree: Option<&TreeNode>, tasks: &[TaskRecord], tags: &[TagGroup]) -> Self {
        let Some(tree) = tree else {
            return ContentIndex::default();
        };
        ContentIndex {
            sections: vec![
                IndexNode::from_tree(tree),
                build_task_section(tasks),
                build_tag_section(tags),
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The file tree root, if loaded.
    pub fn files(&self) -> Option<&IndexNode> {
        self.sections.first()
    }

    /// Find a group node anywhere in the forest.
    pub fn resolve(&self, target: &GroupRef) -> Option<&IndexNode> {
        self.sections.iter().find_map(|s| s.find_group(target))
    }

    /// Node at a child-index path, starting with the section index.
    pub fn node_at(&self, path: &[usize]) -> Option<&IndexNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.sections.get(*first)?;
        for &idx in rest {
            node = node.children().get(idx)?;
        }
        Some(node)
    }

    /// Counts for a group, or `None` if it is not in the forest.
    pub fn summary_for(&self, target: &GroupRef) -> Option<Summary> {
        self.resolve(target).and_then(IndexNode::summary)
    }
}

/// Group tasks into project groups, No Project, then Completed.
pub fn group_tasks(tasks: &[TaskRecord]) -> Vec<(TaskScope, Vec<TaskRecord>)> {
    let mut projects: IndexMap<String, Vec<TaskRecord>> = IndexMap::new();
    let mut no_project = Vec::new();
    let mut completed = Vec::new();

    for task in tasks {
        if task.completed {
            completed.push(task.clone());
        } else if let Some(project) = task.project_name() {
            projects
                .entry(project.to_string())
                .or_default()
                .push(task.clone());
        } else {
            no_project.push(task.clone());
        }
    }

    projects.sort_by(|a, _, b, _| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));

    let mut groups: Vec<(TaskScope, Vec<TaskRecord>)> = projects
        .into_iter()
        .map(|(name, tasks)| (TaskScope::Project(name), tasks))
        .collect();
    if !no_project.is_empty() {
        groups.push((TaskScope::NoProject, no_project));
    }
    if !completed.is_empty() {
        groups.push((TaskScope::Completed, completed));
    }
    for (_, tasks) in &mut groups {
        sort_tasks(tasks);
    }
    groups
}

fn build_task_section(tasks: &[TaskRecord]) -> IndexNode {
    let children = group_tasks(tasks)
        .into_iter()
        .map(|(scope, tasks)| IndexNode::TaskGroup {
            scope,
            children: tasks.into_iter().map(IndexNode::Task).collect(),
        })
        .collect();
    IndexNode::TaskGroup {
        scope: TaskScope::All,
        children,
    }
}

fn build_tag_section(tags: &[TagGroup]) -> IndexNode {
    IndexNode::TagGroup {
        children: tags
            .iter()
            .map(|group| IndexNode::Tag {
                name: group.tag.clone(),
                children: group
                    .notes
                    .iter()
                    .map(|note| IndexNode::Note {
                        name: note.name.clone(),
                        path: note.path.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteRef;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn task(id: &str, project: &str, completed: bool, due: Option<&str>) -> TaskRecord {
        let ts = Utc.timestamp_opt(0, 0).unwrap();
        TaskRecord {
            id: id.into(),
            title: id.into(),
            project: project.into(),
            tags: vec![],
            created: ts,
            updated: ts,
            due_date: due.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            priority: 3,
            completed,
            notes: String::new(),
            source: None,
        }
    }

    fn sample_tree() -> TreeNode {
        TreeNode::folder(
            "Notes",
            "",
            vec![
                TreeNode::folder(
                    "work",
                    "work",
                    vec![
                        TreeNode::folder("empty", "work/empty", vec![]),
                        TreeNode::leaf(NodeKind::Note, "a.md", "work/a.md"),
                        TreeNode::leaf(NodeKind::Note, "b.md", "work/b.md"),
                        TreeNode::leaf(NodeKind::Asset, "c.png", "work/c.png"),
                    ],
                ),
                TreeNode::leaf(NodeKind::Note, "z.md", "z.md"),
                TreeNode::leaf(NodeKind::Pdf, "r.pdf", "r.pdf"),
                TreeNode::leaf(NodeKind::Csv, "d.csv", "d.csv"),
            ],
        )
    }

    fn labels(nodes: &[IndexNode]) -> Vec<&str> {
        nodes.iter().map(IndexNode::label).collect()
    }

    #[test]
    fn folder_counts_descendants() {
        let index = ContentIndex::build(Some(&sample_tree()), &[], &[]);
        let work = index.resolve(&GroupRef::Folder("work".into())).unwrap();
        assert_eq!(
            work.summary(),
            Some(Summary::Files(FileCounts {
                folders: 1,
                notes: 2,
                assets: 1,
                pdfs: 0,
                csvs: 0,
            }))
        );
        assert_eq!(
            index.summary_for(&GroupRef::Folder(String::new())),
            Some(Summary::Files(FileCounts {
                folders: 2,
                notes: 3,
                assets: 1,
                pdfs: 1,
                csvs: 1,
            }))
        );
    }

    #[test]
    fn absent_tree_gives_empty_forest() {
        let index = ContentIndex::build(None, &[task("t", "", false, None)], &[]);
        assert!(index.is_empty());
        assert!(index.resolve(&GroupRef::Tags).is_none());
    }

    #[test]
    fn empty_root_keeps_sections_with_zero_counts() {
        let root = TreeNode::folder("Notes", "", vec![]);
        let index = ContentIndex::build(Some(&root), &[task("t", "", false, None)], &[]);
        assert_eq!(labels(&index.sections), vec!["Notes", "Tasks", "Tags"]);
        assert!(index.files().unwrap().children().is_empty());
        assert_eq!(
            index.summary_for(&GroupRef::Folder(String::new())),
            Some(Summary::Files(FileCounts::default()))
        );
        assert!(index.resolve(&GroupRef::Tasks(TaskScope::NoProject)).is_some());
    }

    #[test]
    fn tree_order_is_preserved() {
        let index = ContentIndex::build(Some(&sample_tree()), &[], &[]);
        let root = index.files().unwrap();
        assert_eq!(labels(root.children()), vec!["work", "z.md", "r.pdf", "d.csv"]);
        assert_eq!(labels(&index.sections), vec!["Notes", "Tasks", "Tags"]);
    }

    #[test]
    fn tasks_grouped_projects_then_none_then_completed() {
        let tasks = vec![
            task("done", "beta", true, None),
            task("b1", "beta", false, None),
            task("loose", "  ", false, None),
            task("a1", "Alpha", false, Some("2024-05-01")),
            task("a0", "Alpha", false, Some("2024-01-01")),
            task("c1", "charlie", false, None),
        ];
        let index = ContentIndex::build(Some(&sample_tree()), &tasks, &[]);
        let section = &index.sections[1];
        assert_eq!(
            labels(section.children()),
            vec!["Alpha", "beta", "charlie", "No Project", "Completed"]
        );
        // Completed tasks are not duplicated into their project group
        assert_eq!(labels(section.children()[1].children()), vec!["b1"]);
        assert_eq!(labels(section.children()[4].children()), vec!["done"]);
        // Comparator applied within groups
        assert_eq!(labels(section.children()[0].children()), vec!["a0", "a1"]);
    }

    #[test]
    fn projects_are_case_sensitive_groups() {
        let tasks = vec![task("1", "Home", false, None), task("2", "home", false, None)];
        let groups = group_tasks(&tasks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, TaskScope::Project("Home".into()));
        assert_eq!(groups[1].0, TaskScope::Project("home".into()));
    }

    #[test]
    fn projects_group_on_the_exact_string() {
        let tasks = vec![
            task("1", "Home", false, None),
            task("2", " Home", false, None),
            task("3", "  ", false, None),
        ];
        let groups = group_tasks(&tasks);
        let scopes: Vec<&TaskScope> = groups.iter().map(|(scope, _)| scope).collect();
        assert_eq!(
            scopes,
            vec![
                &TaskScope::Project(" Home".into()),
                &TaskScope::Project("Home".into()),
                &TaskScope::NoProject,
            ]
        );
    }

    #[test]
    fn task_counts() {
        let tasks = vec![
            task("1", "a", false, None),
            task("2", "a", true, None),
            task("3", "b", false, None),
            task("4", "", false, None),
            task("5", "", true, None),
        ];
        let index = ContentIndex::build(Some(&sample_tree()), &tasks, &[]);
        assert_eq!(
            index.summary_for(&GroupRef::Tasks(TaskScope::All)),
            Some(Summary::Tasks(TaskCounts {
                total: 5,
                completed: 2,
                active: 3,
                projects: 2,
                no_project: 2,
            }))
        );
        assert_eq!(
            index.summary_for(&GroupRef::Tasks(TaskScope::Project("a".into()))),
            Some(Summary::Tasks(TaskCounts {
                total: 1,
                completed: 0,
                active: 1,
                projects: 1,
                no_project: 0,
            }))
        );
    }

    #[test]
    fn tags_keep_store_order() {
        let note = |p: &str| NoteRef {
            path: p.into(),
            name: p.into(),
        };
        let tags = vec![
            TagGroup {
                tag: "zeta".into(),
                notes: vec![note("b.md"), note("a.md")],
            },
            TagGroup {
                tag: "alpha".into(),
                notes: vec![note("a.md")],
            },
        ];
        let index = ContentIndex::build(Some(&sample_tree()), &[], &tags);
        let section = &index.sections[2];
        assert_eq!(labels(section.children()), vec!["zeta", "alpha"]);
        assert_eq!(labels(section.children()[0].children()), vec!["b.md", "a.md"]);
        assert_eq!(
            section.summary(),
            Some(Summary::Tags(TagCounts { tags: 2, notes: 2 }))
        );
        assert_eq!(
            index.summary_for(&GroupRef::Tag("zeta".into())),
            Some(Summary::Tags(TagCounts { tags: 1, notes: 2 }))
        );
    }

    #[test]
    fn build_is_idempotent() {
        let tasks = vec![task("1", "a", false, None), task("2", "", true, None)];
        let first = ContentIndex::build(Some(&sample_tree()), &tasks, &[]);
        let second = ContentIndex::build(Some(&sample_tree()), &tasks, &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn node_at_and_create_scope() {
        let tasks = vec![task("1", "a", false, None)];
        let index = ContentIndex::build(Some(&sample_tree()), &tasks, &[]);
        assert_eq!(index.node_at(&[0, 0, 1]).map(IndexNode::label), Some("a.md"));
        assert_eq!(
            index.node_at(&[0, 0, 1]).and_then(IndexNode::entity),
            Some(EntityRef::path("work/a.md"))
        );
        assert!(index.node_at(&[9]).is_none());

        let group = index.node_at(&[1, 0]).unwrap();
        assert_eq!(
            group.create_scope(),
            CreateScope::Task {
                project: Some("a".into())
            }
        );
        assert_eq!(
            index.files().unwrap().create_scope(),
            CreateScope::Note {
                folder: String::new()
            }
        );
        assert_eq!(index.sections[2].create_scope(), CreateScope::Nothing);
    }

    #[test]
    fn summaries_describe_counts() {
        let files = Summary::Files(FileCounts {
            folders: 1,
            notes: 2,
            ..FileCounts::default()
        });
        assert_eq!(
            files.describe(),
            vec!["1 folder", "2 notes", "0 images", "0 PDFs", "0 CSV files"]
        );
        let tags = Summary::Tags(TagCounts { tags: 1, notes: 1 });
        assert_eq!(tags.describe(), vec!["1 tag", "1 tagged note"]);
    }
}
