use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{EntityRef, Layout};
use crate::tui::app::{App, Focus, InputMode};
use crate::workspace::Surface;

use super::helpers::push_right_aligned;

/// Key hints for the current focus and surface
fn hints(app: &App) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if app.ctl.save_enabled() {
        parts.push("^S save");
    }
    match (app.focus, app.ctl.surface()) {
        (Focus::Sidebar, _) => {
            parts.extend(["Enter open", "n new", "/ search", ", settings", "q quit"]);
        }
        (Focus::Content, Surface::Note(note)) if note.layout == Layout::Preview => {
            parts.extend(["j/k scroll", "1/2/3 layout", "Tab sidebar"]);
        }
        (Focus::Content, Surface::Note(_)) => parts.extend(["Alt-1/2/3 layout", "Tab sidebar"]),
        (Focus::Content, Surface::Task(_)) | (Focus::Content, Surface::Settings(_)) => {
            parts.extend(["\u{2191}\u{2193} field", "\u{2190}\u{2192} change", "Tab sidebar"]);
        }
        (Focus::Content, Surface::Summary(_)) => parts.extend(["n new", "Tab sidebar"]),
        (Focus::Content, Surface::Asset(_)) => parts.extend(["j/k scroll", "Tab sidebar"]),
    }
    parts.join("  ")
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let base = Style::default().bg(bg);
    let dim = base.fg(app.theme.dim);

    let line = match &app.input {
        InputMode::Navigate => {
            let mut spans = vec![Span::styled(
                format!(" {} ", app.ctl.mode().as_str().to_uppercase()),
                Style::default()
                    .fg(app.theme.background)
                    .bg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            )];
            if let Some(EntityRef::Path(path)) = app.ctl.state().open_entity() {
                spans.push(Span::styled(format!(" {}", path), base.fg(app.theme.text)));
            }
            if app.ctl.is_dirty() {
                spans.push(Span::styled(" \u{25CF}", base.fg(app.theme.unsaved))); // ●
            }
            if let Some(msg) = &app.message {
                let fg = if msg.is_error {
                    app.theme.error
                } else {
                    app.theme.saved
                };
                spans.push(Span::styled(format!("  {}", msg.text), base.fg(fg)));
            }
            if app.config.ui.show_key_hints {
                push_right_aligned(&mut spans, vec![Span::styled(hints(app), dim)], width, base);
            }
            Line::from(spans)
        }
        InputMode::Search => input_line(
            app,
            " /",
            &app.search_input,
            "Enter search  Esc cancel",
            width,
        ),
        InputMode::Results => {
            let mut spans = vec![Span::styled(
                format!(" {} results", app.search_results.len()),
                base.fg(app.theme.text),
            )];
            push_right_aligned(
                &mut spans,
                vec![Span::styled("j/k move  Enter open  Esc close", dim)],
                width,
                base,
            );
            Line::from(spans)
        }
        InputMode::Prompt(kind) => input_line(
            app,
            &format!(" {}: ", kind.label()),
            &app.prompt_input,
            "Enter ok  Esc cancel",
            width,
        ),
        InputMode::Confirm(target) => Line::from(vec![
            Span::styled(
                format!(" Delete {}?", target.describe()),
                base.fg(app.theme.error).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" y/n", dim),
        ]),
    };

    let paragraph = Paragraph::new(line).style(base);
    frame.render_widget(paragraph, area);
}

/// Prompt + typed text + cursor, with hints on the right
fn input_line(app: &App, prompt: &str, input: &str, hint: &str, width: usize) -> Line<'static> {
    let base = Style::default().bg(app.theme.background);
    let mut spans = vec![
        Span::styled(format!("{}{}", prompt, input), base.fg(app.theme.text_bright)),
        Span::styled("\u{258C}", base.fg(app.theme.highlight)), // ▌ cursor
    ];
    push_right_aligned(
        &mut spans,
        vec![Span::styled(hint.to_string(), base.fg(app.theme.dim))],
        width,
        base,
    );
    Line::from(spans)
}
