mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, load_config};
use crate::io::fs_store::FsStore;
use crate::io::store::ContentStore;
use crate::model::SettingsPatch;
use crate::ops::index::{ContentIndex, GroupRef, TaskScope, group_tasks};
use crate::ops::markdown::render_html;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, notes_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let Some(cmd) = cli.command else {
        return Ok(());
    };
    debug!(dir = %notes_dir.display(), "cli command");

    match cmd {
        Commands::Init(args) => cmd_init(notes_dir, args),
        Commands::Config(args) => cmd_config(notes_dir, args, json),
        cmd => {
            let store = open_store(notes_dir)?;
            match cmd {
                Commands::Tree(args) => cmd_tree(&store, args, json),
                Commands::Tasks(args) => cmd_tasks(&store, args, json),
                Commands::Tags => cmd_tags(&store, json),
                Commands::Search(args) => cmd_search(&store, args, json),
                Commands::Cat(args) => cmd_cat(&store, args, json),
                Commands::Summary(args) => cmd_summary(&store, args, json),
                Commands::Settings(args) => cmd_settings(&store, args, json),
                Commands::Init(_) | Commands::Config(_) => Ok(()),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve `-C` (or the current directory) to an absolute notes dir.
pub fn resolve_notes_dir(arg: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match arg {
        Some(dir) => {
            let path = PathBuf::from(dir);
            if path.is_absolute() {
                Ok(path)
            } else {
                Ok(std::env::current_dir()?.join(path))
            }
        }
        None => Ok(std::env::current_dir()?),
    }
}

fn open_store(notes_dir: &Path) -> Result<FsStore, Box<dyn std::error::Error>> {
    if !notes_dir.is_dir() {
        return Err(format!("notes directory not found: {}", notes_dir.display()).into());
    }
    let config = load_config(notes_dir)?;
    Ok(FsStore::new(notes_dir).with_note_task_sync(config.store.sync_note_tasks))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Store notices (created settings.json / tasks.json) go to stderr so
/// they never mix with JSON output.
fn report_notice(notice: Option<String>) {
    if let Some(notice) = notice {
        eprintln!("{}", notice);
    }
}

fn build_index(store: &FsStore) -> Result<ContentIndex, Box<dyn std::error::Error>> {
    let tree = store.get_tree(None)?;
    let listing = store.get_tasks()?;
    report_notice(listing.notice);
    let tags = store.get_tags()?;
    Ok(ContentIndex::build(Some(&tree), &listing.tasks, &tags))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_tree(store: &FsStore, args: TreeArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tree = store.get_tree(args.path.as_deref())?;
    if json {
        return print_json(&tree);
    }
    print_lines(&format_tree(&tree));
    Ok(())
}

fn cmd_tasks(store: &FsStore, args: TasksArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let listing = store.get_tasks()?;
    report_notice(listing.notice);
    let project = args.project.as_deref().map(|p| p.trim().to_lowercase());
    let tasks: Vec<_> = listing
        .tasks
        .into_iter()
        .filter(|t| args.all || !t.completed)
        .filter(|t| match &project {
            Some(p) => t
                .project_name()
                .is_some_and(|name| name.trim().to_lowercase() == *p),
            None => true,
        })
        .collect();
    let groups = group_tasks(&tasks);

    if json {
        return print_json(&task_groups_to_json(&groups));
    }
    if groups.is_empty() {
        println!("No tasks");
        return Ok(());
    }
    print_lines(&format_task_groups(&groups));
    Ok(())
}

fn cmd_tags(store: &FsStore, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tags = store.get_tags()?;
    if json {
        return print_json(&tags);
    }
    if tags.is_empty() {
        println!("No tags");
        return Ok(());
    }
    print_lines(&format_tags(&tags));
    Ok(())
}

fn cmd_search(store: &FsStore, args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let matches = store.search(&args.query)?;
    if json {
        return print_json(&matches);
    }
    if matches.is_empty() {
        println!("No matches for \"{}\"", args.query.trim());
        return Ok(());
    }
    for m in &matches {
        println!("{}", format_search_match(m));
    }
    Ok(())
}

fn cmd_cat(store: &FsStore, args: CatArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let note = store.get_note(&args.path)?;
    match (args.html, json) {
        (true, true) => print_json(&NoteHtmlJson {
            html: render_html(&note.content),
            path: note.path,
        }),
        (true, false) => {
            print!("{}", render_html(&note.content));
            Ok(())
        }
        (false, true) => print_json(&note),
        (false, false) => {
            print!("{}", note.content);
            if !note.content.is_empty() && !note.content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

fn cmd_summary(store: &FsStore, args: SummaryArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let index = build_index(store)?;
    let (title, group) = if args.tasks {
        ("Tasks".to_string(), GroupRef::Tasks(TaskScope::All))
    } else if args.tags {
        ("Tags".to_string(), GroupRef::Tags)
    } else {
        let path = args
            .path
            .as_deref()
            .unwrap_or_default()
            .trim()
            .trim_matches('/')
            .to_string();
        let title = if path.is_empty() {
            "Notes".to_string()
        } else {
            path.clone()
        };
        (title, GroupRef::Folder(path))
    };

    let Some(counts) = index.summary_for(&group) else {
        return Err(format!("nothing to summarize at {}", title).into());
    };
    if json {
        return print_json(&SummaryJson {
            group: title,
            counts,
        });
    }
    print_lines(&format_summary(&title, &counts));
    Ok(())
}

// ---------------------------------------------------------------------------
// Settings and config
// ---------------------------------------------------------------------------

fn cmd_settings(store: &FsStore, args: SettingsArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match (args.key, args.value) {
        (Some(key), Some(value)) => {
            let mut patch = SettingsPatch::default();
            patch.set_field(&key, &value)?;
            store.update_settings(&patch)?
        }
        _ => {
            let listing = store.get_settings()?;
            report_notice(listing.notice);
            listing.settings
        }
    };
    if json {
        return print_json(&settings);
    }
    print_lines(&format_settings(&settings));
    Ok(())
}

fn cmd_config(notes_dir: &Path, args: ConfigCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, mut doc) = config_io::read_config(notes_dir)?;
    let key = match args.action {
        ConfigAction::Get(get) => get.key,
        ConfigAction::Set(set) => {
            config_io::set_value(&mut doc, &set.key, &set.value)?;
            config_io::write_config(notes_dir, &doc)?;
            set.key
        }
    };
    let value = config_io::get_value(&doc, &key);
    if json {
        return print_json(&ConfigValueJson { key, value });
    }
    match value {
        Some(value) => println!("{}", value),
        None => return Err(format!("{} is not set", key).into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_notes_dir_is_made_absolute() {
        let dir = resolve_notes_dir(Some("notes")).unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("notes"));
        assert_eq!(resolve_notes_dir(None).unwrap(), std::env::current_dir().unwrap());
    }

    #[test]
    fn missing_notes_dir_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = open_store(&tmp.path().join("nope")).err().unwrap();
        assert!(err.to_string().starts_with("notes directory not found"));
    }
}
