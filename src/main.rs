use clap::Parser;
use quill::cli::commands::Cli;
use quill::cli::handlers;
use quill::io::config_io::load_config;
use quill::io::logging::{self, LogTarget};

fn main() {
    let cli = Cli::parse();
    let notes_dir = match handlers::resolve_notes_dir(cli.notes_dir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        // No subcommand → launch TUI
        None => quill::tui::run(&notes_dir),
        Some(_) => {
            let log = load_config(&notes_dir).unwrap_or_default().log;
            logging::init(&notes_dir, &log, LogTarget::Stderr);
            handlers::dispatch(cli, &notes_dir)
        }
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
