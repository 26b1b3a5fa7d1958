use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quill", about = concat!("quill v", env!("CARGO_PKG_VERSION"), " - notes, tasks and tags in a terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Notes directory (default: current directory)
    #[arg(short = 'C', long = "notes-dir", global = true)]
    pub notes_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up a notes directory
    Init(InitArgs),
    /// Show the file tree
    Tree(TreeArgs),
    /// List tasks grouped by project
    Tasks(TasksArgs),
    /// List tags and the notes that use them
    Tags,
    /// Search note names, note contents and tasks
    Search(SearchArgs),
    /// Print a note
    Cat(CatArgs),
    /// Show counts for a folder, the tasks or the tags
    Summary(SummaryArgs),
    /// Show workspace settings, or change one
    Settings(SettingsArgs),
    /// Read or edit the local config (.quill/config.toml)
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Rewrite .quill/config.toml even if it exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Folder to show (default: the whole tree)
    pub path: Option<String>,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Only tasks in this project
    #[arg(long)]
    pub project: Option<String>,
    /// Include completed tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Case-insensitive text to look for
    pub query: String,
}

#[derive(Args)]
pub struct CatArgs {
    /// Note path relative to the notes directory
    pub path: String,
    /// Render the note as HTML
    #[arg(long)]
    pub html: bool,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Folder to count (default: the root)
    pub path: Option<String>,
    /// Count tasks instead of files
    #[arg(long, conflicts_with_all = ["path", "tags"])]
    pub tasks: bool,
    /// Count tags instead of files
    #[arg(long, conflicts_with = "path")]
    pub tags: bool,
}

#[derive(Args)]
pub struct SettingsArgs {
    /// Setting to change (camelCase, e.g. autosaveEnabled)
    #[arg(requires = "value")]
    pub key: Option<String>,
    /// New value
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Config subcommands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a value by dotted key (e.g. ui.show_key_hints)
    Get(ConfigGetArgs),
    /// Set a value by dotted key
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigGetArgs {
    pub key: String,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}
