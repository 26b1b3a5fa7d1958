use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::SearchMatch;
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

/// Inset `area` by a margin that shrinks on small terminals.
fn overlay_area(area: Rect) -> Rect {
    let dx = (area.width / 8).min(4);
    let dy = (area.height / 8).min(2);
    Rect {
        x: area.x + dx,
        y: area.y + dy,
        width: area.width.saturating_sub(2 * dx),
        height: area.height.saturating_sub(2 * dy),
    }
}

/// `kind  name  detail`, where detail is the note path or task id.
fn result_row(m: &SearchMatch) -> String {
    let (kind, detail) = match m {
        SearchMatch::Note { path, .. } => ("note", path),
        SearchMatch::Task { id, .. } => ("task", id),
    };
    format!(" {}  {}  {}", kind, m.name(), detail)
}

/// Search results over the content area; the row under the cursor is
/// highlighted and kept in view.
pub fn render_results_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let base = Style::default().bg(theme.background);
    let popup = overlay_area(area);
    frame.render_widget(Clear, popup);

    let title = format!(
        " Search: {} ",
        app.last_search.as_deref().unwrap_or_default()
    );
    let block = Block::default()
        .title(Span::styled(
            title,
            base.fg(theme.text_bright).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(base.fg(theme.dim))
        .style(base);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines: Vec<Line> = if app.search_results.is_empty() {
        vec![Line::from(Span::styled("No results.", base.fg(theme.dim)))]
    } else {
        let rows = inner.height as usize;
        let width = inner.width as usize;
        let first = (app.results_cursor + 1).saturating_sub(rows);
        app.search_results
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .map(|(i, m)| {
                let style = if i == app.results_cursor {
                    base.fg(theme.text).bg(theme.selection_bg)
                } else {
                    base.fg(theme.text)
                };
                let text = truncate_to_width(&result_row(m), width);
                Line::from(Span::styled(format!("{:<width$}", text), style))
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).style(base), inner);
}
