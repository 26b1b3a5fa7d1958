//! Integration tests for the `quill` CLI.
//!
//! Each test creates a temp notes directory, runs `quill` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Path to the built `quill` binary.
fn quill_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_quill"))
}

const TASKS_JSON: &str = r#"{
  "version": 1,
  "tasks": [
    {
      "id": "a1",
      "title": "Fix sink",
      "project": "home",
      "tags": [],
      "created": "2024-05-01T10:00:00Z",
      "updated": "2024-05-01T10:00:00Z",
      "duedate": "",
      "priority": 1,
      "completed": false,
      "notes": ""
    },
    {
      "id": "b2",
      "title": "Buy milk",
      "project": "",
      "tags": ["errand"],
      "created": "2024-05-02T10:00:00Z",
      "updated": "2024-05-02T10:00:00Z",
      "duedate": "2024-06-01",
      "priority": 3,
      "completed": false,
      "notes": ""
    },
    {
      "id": "c3",
      "title": "Old chore",
      "project": "home",
      "tags": [],
      "created": "2024-04-01T10:00:00Z",
      "updated": "2024-04-01T10:00:00Z",
      "duedate": "",
      "priority": 3,
      "completed": true,
      "notes": ""
    }
  ]
}
"#;

/// Create a small notes directory in `root`.
fn create_test_notes(root: &Path) {
    fs::create_dir_all(root.join("work")).unwrap();
    fs::write(root.join("work/plan.md"), "# Plan\n\nship it #Work\n").unwrap();
    fs::write(root.join("inbox.md"), "buy milk #idea\n").unwrap();
    fs::write(root.join("ideas.md"), "#idea more\n").unwrap();
    fs::write(root.join("pic.png"), [0u8; 4]).unwrap();
    fs::write(root.join("tasks.json"), TASKS_JSON).unwrap();
}

fn run_quill(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(quill_bin())
        .args(["-C", dir.to_str().unwrap()])
        .args(args)
        .env_remove("QUILL_LOG")
        .output()
        .expect("failed to run quill");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn run_quill_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, ok) = run_quill(dir, args);
    assert!(ok, "quill {:?} failed: {}", args, stderr);
    stdout
}

fn notes() -> TempDir {
    let tmp = TempDir::new().unwrap();
    create_test_notes(tmp.path());
    tmp
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_tree() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["tree"]);
    assert_eq!(
        out,
        "Notes/\n  work/\n    plan.md\n  ideas.md\n  inbox.md\n  pic.png\n"
    );
    // settings.json was created but stays hidden
    assert!(tmp.path().join("settings.json").exists());
}

#[test]
fn test_tree_subfolder_and_json() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["tree", "work"]);
    assert_eq!(out, "Notes/\n  plan.md\n");

    let out = run_quill_ok(tmp.path(), &["--json", "tree"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["type"], "folder");
    assert_eq!(json["name"], "Notes");
    assert_eq!(json["children"][0]["path"], "work");
}

#[test]
fn test_tree_rejects_escaping_path() {
    let tmp = notes();
    let (_, stderr, ok) = run_quill(tmp.path(), &["tree", "../"]);
    assert!(!ok);
    assert!(stderr.starts_with("error: "));
}

#[test]
fn test_tasks_grouped_and_sorted() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["tasks"]);
    assert_eq!(
        out,
        "== home ==\n  [ ] Fix sink  p1\n\n== No Project ==\n  [ ] Buy milk #errand  p3  due 2024-06-01\n"
    );

    let out = run_quill_ok(tmp.path(), &["tasks", "--all"]);
    assert!(out.contains("== Completed ==\n  [x] Old chore  p3"));
}

#[test]
fn test_tasks_project_filter_json() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["tasks", "--project", "HOME", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    let groups = json.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["group"], "home");
    assert_eq!(groups[0]["tasks"][0]["id"], "a1");
}

#[test]
fn test_tasks_file_created_on_first_use() {
    let tmp = TempDir::new().unwrap();
    let (stdout, stderr, ok) = run_quill(tmp.path(), &["tasks"]);
    assert!(ok);
    assert_eq!(stdout, "No tasks\n");
    assert!(stderr.contains("Created tasks.json"));
    assert!(tmp.path().join("tasks.json").exists());
}

#[test]
fn test_tags() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["tags"]);
    assert_eq!(
        out,
        "#idea (2)\n  ideas.md\n  inbox.md\n#Work (1)\n  work/plan.md\n"
    );
}

#[test]
fn test_search() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["search", "MILK"]);
    assert_eq!(out, "note  inbox.md\ntask  Buy milk  b2\n");

    let out = run_quill_ok(tmp.path(), &["search", "nothing-here"]);
    assert_eq!(out, "No matches for \"nothing-here\"\n");
}

#[test]
fn test_search_requires_query() {
    let tmp = notes();
    let (_, stderr, ok) = run_quill(tmp.path(), &["search", "   "]);
    assert!(!ok);
    assert!(stderr.contains("query is required"));
}

#[test]
fn test_cat() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["cat", "work/plan.md"]);
    assert_eq!(out, "# Plan\n\nship it #Work\n");

    let out = run_quill_ok(tmp.path(), &["cat", "work/plan.md", "--html"]);
    assert!(out.contains("<h1>Plan</h1>"));

    let (_, stderr, ok) = run_quill(tmp.path(), &["cat", "missing.md"]);
    assert!(!ok);
    assert!(stderr.starts_with("error: "));
}

#[test]
fn test_summary() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["summary"]);
    assert_eq!(
        out,
        "Notes\n  1 folder\n  3 notes\n  1 image\n  0 PDFs\n  0 CSV files\n"
    );

    let out = run_quill_ok(tmp.path(), &["summary", "--tasks", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["group"], "Tasks");
    assert_eq!(json["section"], "tasks");
    assert_eq!(json["total"], 3);
    assert_eq!(json["completed"], 1);

    let (_, stderr, ok) = run_quill(tmp.path(), &["summary", "nope"]);
    assert!(!ok);
    assert!(stderr.contains("nothing to summarize"));
}

// ---------------------------------------------------------------------------
// Settings and config
// ---------------------------------------------------------------------------

#[test]
fn test_settings_show_and_set() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["settings"]);
    assert!(out.starts_with("darkMode = false\ndefaultView = split\n"));

    let out = run_quill_ok(tmp.path(), &["settings", "darkMode", "on"]);
    assert!(out.starts_with("darkMode = true\n"));
    let saved = fs::read_to_string(tmp.path().join("settings.json")).unwrap();
    assert!(saved.contains("\"darkMode\": true"));
}

#[test]
fn test_settings_validation() {
    let tmp = notes();
    let (_, stderr, ok) = run_quill(tmp.path(), &["settings", "sidebarWidth", "100"]);
    assert!(!ok);
    assert!(stderr.contains("sidebarWidth must be between 220 and 600"));

    let (_, stderr, ok) = run_quill(tmp.path(), &["settings", "colour", "red"]);
    assert!(!ok);
    assert!(stderr.contains("unknown setting: colour"));
}

#[test]
fn test_config_set_and_get() {
    let tmp = notes();
    let out = run_quill_ok(tmp.path(), &["config", "set", "ui.show_key_hints", "false"]);
    assert_eq!(out, "false\n");
    let out = run_quill_ok(tmp.path(), &["config", "get", "ui.show_key_hints"]);
    assert_eq!(out, "false\n");

    let text = fs::read_to_string(tmp.path().join(".quill/config.toml")).unwrap();
    assert!(text.contains("show_key_hints = false"));

    let (_, stderr, ok) = run_quill(tmp.path(), &["config", "get", "log.level"]);
    assert!(!ok);
    assert!(stderr.contains("log.level is not set"));
}

#[test]
fn test_init() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("fresh");
    let out = run_quill_ok(&dir, &["init"]);
    assert!(out.contains("Created settings.json"));
    assert!(out.contains("Created tasks.json"));
    assert!(out.ends_with(&format!("Initialized notes in {}\n", dir.display())));

    let out = run_quill_ok(&dir, &["init"]);
    assert!(out.starts_with("Already initialized"));
}

#[test]
fn test_missing_notes_dir() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, ok) = run_quill(&tmp.path().join("nope"), &["tags"]);
    assert!(!ok);
    assert!(stderr.starts_with("error: notes directory not found"));
}
