use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, DeleteTarget, InputMode, PromptKind};

/// Typing into a single-line buffer. Returns false for keys it ignores.
fn edit_line(buf: &mut String, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            buf.push(c);
            true
        }
        KeyCode::Backspace => {
            buf.pop();
            true
        }
        _ => false,
    }
}

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.run_search(),
        KeyCode::Esc => {
            app.search_input.clear();
            app.input = InputMode::Navigate;
        }
        _ => {
            edit_line(&mut app.search_input, key);
        }
    }
}

pub(super) fn handle_results(app: &mut App, key: KeyEvent) {
    let len = app.search_results.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down if len > 0 => {
            app.results_cursor = (app.results_cursor + 1).min(len - 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.results_cursor = app.results_cursor.saturating_sub(1);
        }
        KeyCode::Enter => app.open_search_result(),
        KeyCode::Esc => app.input = InputMode::Navigate,
        _ => {}
    }
}

pub(super) fn handle_prompt(app: &mut App, kind: PromptKind, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_prompt(kind),
        KeyCode::Esc => {
            app.prompt_input.clear();
            app.input = InputMode::Navigate;
        }
        _ => {
            edit_line(&mut app.prompt_input, key);
        }
    }
}

pub(super) fn handle_confirm(app: &mut App, target: DeleteTarget, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(target),
        _ => app.input = InputMode::Navigate,
    }
}
