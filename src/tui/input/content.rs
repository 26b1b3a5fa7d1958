use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Layout;
use crate::tui::app::{App, Focus};
use crate::tui::forms::{SETTINGS_FIELDS, TASK_FIELDS, TaskField};
use crate::workspace::{Pane, Surface};

pub(super) fn handle_content(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            app.focus = Focus::Sidebar;
            return;
        }
        KeyCode::Char(c @ '1'..='3') if key.modifiers.contains(KeyModifiers::ALT) => {
            set_layout(app, c);
            return;
        }
        _ => {}
    }

    match app.ctl.surface() {
        Surface::Note(note) if note.layout == Layout::Preview => handle_preview(app, key, now),
        Surface::Note(_) => handle_editor(app, key, now),
        Surface::Task(_) => handle_task_form(app, key),
        Surface::Settings(_) => handle_settings_form(app, key),
        Surface::Summary(view) => {
            let scope = view.create.clone();
            match key.code {
                KeyCode::Char('n') => app.new_item(scope, false),
                KeyCode::Char('N') => app.new_item(scope, true),
                _ => {}
            }
        }
        Surface::Asset(_) => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.asset_scroll += 1,
            KeyCode::Char('k') | KeyCode::Up => {
                app.asset_scroll = app.asset_scroll.saturating_sub(1)
            }
            _ => {}
        },
    }
}

/// Switch note layout from a '1'/'2'/'3' key.
pub(super) fn set_layout(app: &mut App, c: char) {
    let layout = match c {
        '1' => Layout::Edit,
        '2' => Layout::Preview,
        _ => Layout::Split,
    };
    app.ctl.set_note_layout(layout);
}

fn page(app: &App, pane: Pane) -> isize {
    let height = app.panes.area(pane).map_or(10, |r| r.height);
    height.max(2) as isize - 1
}

fn handle_preview(app: &mut App, key: KeyEvent, now: Instant) {
    let delta = match key.code {
        KeyCode::Char(c @ '1'..='3') => {
            set_layout(app, c);
            return;
        }
        KeyCode::Char('j') | KeyCode::Down => 1,
        KeyCode::Char('k') | KeyCode::Up => -1,
        KeyCode::PageDown | KeyCode::Char(' ') => page(app, Pane::Preview),
        KeyCode::PageUp => -page(app, Pane::Preview),
        KeyCode::Home | KeyCode::Char('g') => isize::MIN / 2,
        KeyCode::End | KeyCode::Char('G') => isize::MAX / 2,
        _ => return,
    };
    app.scroll_pane(Pane::Preview, delta, true, now);
}

/// Keep the cursor on screen; a resulting scroll may drive the preview.
pub(super) fn follow_editor_cursor(app: &mut App, now: Instant) {
    let Surface::Note(note) = app.ctl.surface() else {
        return;
    };
    let height = app.panes.editor.map_or(0, |r| usize::from(r.height));
    if app.editor.follow_cursor(&note.text, height) {
        app.follow_scroll(Pane::Editor, now);
    }
}

fn handle_editor(app: &mut App, key: KeyEvent, now: Instant) {
    let page_rows = page(app, Pane::Editor);
    let Surface::Note(note) = app.ctl.surface() else {
        return;
    };
    let text = note.text.as_str();
    let word = key.modifiers.contains(KeyModifiers::ALT);
    let editor = &mut app.editor;

    let edited = match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(editor.insert(text, c.encode_utf8(&mut [0; 4])))
        }
        KeyCode::Enter => Some(editor.insert(text, "\n")),
        KeyCode::Backspace => editor.backspace(text),
        KeyCode::Delete => editor.delete(text),
        KeyCode::Left if word => {
            editor.word_left(text);
            None
        }
        KeyCode::Right if word => {
            editor.word_right(text);
            None
        }
        KeyCode::Left => {
            editor.left(text);
            None
        }
        KeyCode::Right => {
            editor.right(text);
            None
        }
        KeyCode::Up => {
            editor.vertical(text, -1);
            None
        }
        KeyCode::Down => {
            editor.vertical(text, 1);
            None
        }
        KeyCode::Home => {
            editor.home(text);
            None
        }
        KeyCode::End => {
            editor.end(text);
            None
        }
        KeyCode::PageUp | KeyCode::PageDown => {
            let rows = if key.code == KeyCode::PageUp {
                -page_rows
            } else {
                page_rows
            };
            editor.vertical(text, rows);
            None
        }
        _ => return,
    };

    if let Some(updated) = edited {
        app.ctl.edit_note_text(updated);
    }
    follow_editor_cursor(app, now);
}

fn handle_task_form(app: &mut App, key: KeyEvent) {
    let last = TASK_FIELDS.len() - 1;
    let field = TASK_FIELDS[app.form_field.min(last)];
    match key.code {
        KeyCode::Up | KeyCode::BackTab => app.form_field = app.form_field.saturating_sub(1),
        KeyCode::Down => app.form_field = (app.form_field + 1).min(last),
        KeyCode::Enter if field == TaskField::Notes => {
            app.ctl.edit_task(|draft| field.push_char(draft, '\n'));
        }
        KeyCode::Enter => app.form_field = (app.form_field + 1).min(last),
        KeyCode::Left => {
            app.ctl.edit_task(|draft| {
                field.adjust(draft, -1);
            });
        }
        KeyCode::Right => {
            app.ctl.edit_task(|draft| {
                field.adjust(draft, 1);
            });
        }
        KeyCode::Backspace => {
            app.ctl.edit_task(|draft| field.pop_char(draft));
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ctl.edit_task(|draft| {
                if !matches!(c, '+' | '-') || !field.adjust(draft, if c == '+' { 1 } else { -1 }) {
                    field.push_char(draft, c);
                }
            });
        }
        _ => {}
    }
}

fn handle_settings_form(app: &mut App, key: KeyEvent) {
    let last = SETTINGS_FIELDS.len() - 1;
    let field = SETTINGS_FIELDS[app.form_field.min(last)];
    match key.code {
        KeyCode::Up | KeyCode::BackTab => app.form_field = app.form_field.saturating_sub(1),
        KeyCode::Down | KeyCode::Enter => app.form_field = (app.form_field + 1).min(last),
        KeyCode::Left => {
            app.ctl.edit_settings(|s| {
                field.adjust(s, -1);
            });
        }
        KeyCode::Right => {
            app.ctl.edit_settings(|s| {
                field.adjust(s, 1);
            });
        }
        KeyCode::Backspace => {
            app.ctl.edit_settings(|s| field.pop_char(s));
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.ctl.edit_settings(|s| {
                if !matches!(c, '+' | '-') || !field.adjust(s, if c == '+' { 1 } else { -1 }) {
                    field.push_char(s, c);
                }
            });
        }
        _ => {}
    }
}
