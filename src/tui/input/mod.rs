mod content;
mod navigate;
mod prompt;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::workspace::Surface;

use super::app::{App, Focus, InputMode};
use super::forms::{SETTINGS_FIELDS, TASK_FIELDS};

/// Rows scrolled per mouse wheel notch
const WHEEL_ROWS: isize = 3;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    handle_key_at(app, key, Instant::now());
}

pub fn handle_key_at(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.code != KeyCode::Char('q') {
        app.quit_armed = false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') if app.input == InputMode::Navigate => {
                app.save();
                return;
            }
            KeyCode::Char('c') => {
                app.request_quit();
                return;
            }
            _ => {}
        }
    }

    match app.input.clone() {
        InputMode::Navigate => match app.focus {
            Focus::Sidebar => navigate::handle_sidebar(app, key),
            Focus::Content => content::handle_content(app, key, now),
        },
        InputMode::Search => prompt::handle_search(app, key),
        InputMode::Results => prompt::handle_results(app, key),
        InputMode::Prompt(kind) => prompt::handle_prompt(app, kind, key),
        InputMode::Confirm(target) => prompt::handle_confirm(app, target, key),
    }
}

/// Mouse wheel over a note pane is direct scroll input for that pane.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    let delta = match mouse.kind {
        MouseEventKind::ScrollDown => WHEEL_ROWS,
        MouseEventKind::ScrollUp => -WHEEL_ROWS,
        _ => return,
    };
    match app.ctl.surface() {
        Surface::Note(_) => {
            if let Some(pane) = app.panes.pane_at(mouse.column, mouse.row) {
                app.scroll_pane(pane, delta, true, now);
            }
        }
        Surface::Asset(_) => {
            app.asset_scroll = app.asset_scroll.saturating_add_signed(delta);
        }
        _ => {}
    }
}

/// Handle a bracketed paste: text goes wherever typing would go.
pub fn handle_paste(app: &mut App, text: &str) {
    let text = text.replace('\r', "");
    match &app.input {
        InputMode::Search => {
            app.search_input
                .push_str(text.lines().next().unwrap_or_default());
            return;
        }
        InputMode::Prompt(_) => {
            app.prompt_input
                .push_str(text.lines().next().unwrap_or_default());
            return;
        }
        InputMode::Navigate if app.focus == Focus::Content => {}
        _ => return,
    }

    match app.ctl.surface() {
        Surface::Note(note) if note.layout.shows_editor() => {
            let updated = app.editor.insert(&note.text, &text);
            app.ctl.edit_note_text(updated);
            content::follow_editor_cursor(app, Instant::now());
        }
        Surface::Task(_) => {
            let field = TASK_FIELDS[app.form_field.min(TASK_FIELDS.len() - 1)];
            app.ctl.edit_task(|draft| {
                for c in text.chars() {
                    field.push_char(draft, c);
                }
            });
        }
        Surface::Settings(_) => {
            let field = SETTINGS_FIELDS[app.form_field.min(SETTINGS_FIELDS.len() - 1)];
            app.ctl.edit_settings(|settings| {
                for c in text.chars().filter(|c| *c != '\n') {
                    field.push_char(settings, c);
                }
            });
        }
        _ => {}
    }
}
