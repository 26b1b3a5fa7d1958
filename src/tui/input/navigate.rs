use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Focus, InputMode};
use crate::workspace::Surface;

use super::content::set_layout;

const PAGE_ROWS: isize = 10;

/// Keys while the sidebar has focus.
pub(super) fn handle_sidebar(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_sidebar(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_sidebar(-1),
        KeyCode::PageDown => app.move_sidebar(PAGE_ROWS),
        KeyCode::PageUp => app.move_sidebar(-PAGE_ROWS),
        KeyCode::Char('g') | KeyCode::Home => app.sidebar_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.move_sidebar(isize::MAX),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('l') | KeyCode::Right => app.set_expanded(true),
        KeyCode::Char('h') | KeyCode::Left => app.set_expanded(false),
        KeyCode::Tab => app.focus = Focus::Content,

        KeyCode::Char('n') => app.new_item(app.selected_scope(), false),
        KeyCode::Char('N') => app.new_item(app.selected_scope(), true),
        KeyCode::Char('d') => app.start_delete(),
        KeyCode::Char('r') => app.start_rename(),
        KeyCode::Char('x') => app.toggle_task(),

        KeyCode::Char('/') => {
            app.search_input.clear();
            app.input = InputMode::Search;
        }
        KeyCode::Char(',') => app.open_settings(),
        KeyCode::Char('R') => app.reload(),
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char(c @ '1'..='3') if matches!(app.ctl.surface(), Surface::Note(_)) => {
            set_layout(app, c)
        }
        KeyCode::Esc => app.message = None,
        _ => {}
    }
}
