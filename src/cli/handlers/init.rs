use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::config_path;
use crate::io::fs_store::FsStore;
use crate::io::state::client_dir;
use crate::io::store::ContentStore;

const CONFIG_TOML_TEMPLATE: &str = r##"# Local preferences for this notes directory.
# Workspace settings (dark mode, autosave, folders) live in settings.json
# and are edited with `quill settings`.

[ui]
show_key_hints = true

# # replaces the built-in tag palette
# tag_palette = ["#E5484D", "#F76B15", "#FFC53D", "#46A758"]
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"

[log]
level = "info"
file = ".quill/quill.log"

[store]
# turn `* ` bullet lines in notes into tasks on save
sync_note_tasks = false
"##;

/// Create the notes directory with settings.json, tasks.json and a
/// commented .quill/config.toml.
pub fn cmd_init(notes_dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(notes_dir)?;

    let store = FsStore::new(notes_dir);
    let mut notices = Vec::new();
    notices.extend(store.get_settings()?.notice);
    notices.extend(store.get_tasks()?.notice);

    let config = config_path(notes_dir);
    if args.force || !config.exists() {
        fs::create_dir_all(client_dir(notes_dir))?;
        fs::write(&config, CONFIG_TOML_TEMPLATE)?;
        notices.push("Created .quill/config.toml".to_string());
    }

    for notice in &notices {
        println!("{}", notice);
    }
    if notices.is_empty() {
        println!("Already initialized: {}", notes_dir.display());
    } else {
        println!("Initialized notes in {}", notes_dir.display());
    }
    Ok(())
}
