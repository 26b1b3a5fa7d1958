use std::fs;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::fs_store::FsStore;
use crate::model::ClientConfig;
use crate::tui::app::App;
use crate::workspace::ModeController;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Write `files` into a fresh notes dir and open an app on it. The
/// startup notices (created settings.json / tasks.json) are cleared.
pub fn app_with_notes(files: &[(&str, &str)]) -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let abs = dir.path().join(path);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(abs, content).unwrap();
    }
    let mut ctl = ModeController::new(FsStore::new(dir.path()));
    ctl.load_workspace().unwrap();
    let mut app = App::new(ctl, dir.path().to_path_buf(), ClientConfig::default());
    app.message = None;
    (dir, app)
}
