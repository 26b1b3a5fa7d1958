use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::app::App;
use crate::util::unicode::{self, truncate_to_width};

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `left` with spaces so `right` ends at `width`. `right` is dropped
/// when both do not fit.
pub(super) fn push_right_aligned<'a>(
    left: &mut Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    width: usize,
    style: Style,
) {
    let used = spans_width(left);
    let right_width = spans_width(&right);
    if used + right_width < width {
        left.push(Span::styled(" ".repeat(width - used - right_width), style));
        left.extend(right);
    }
}

/// Bold title row used at the top of a surface.
pub(super) fn title_line(app: &App, title: &str, note: Option<&str>) -> Line<'static> {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(note) = note {
        spans.push(Span::styled(
            format!("  {}", note),
            Style::default().fg(app.theme.unsaved).bg(bg),
        ));
    }
    Line::from(spans)
}

/// One `label  value` row of a form. An empty value shows `hint` dimmed.
#[allow(clippy::too_many_arguments)]
pub(super) fn form_row(
    app: &App,
    label: &str,
    label_width: usize,
    value: &str,
    hint: &str,
    selected: bool,
    editing: bool,
    width: usize,
) -> Line<'static> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let base = Style::default().bg(bg);
    let label_style = if selected {
        base.fg(app.theme.text_bright).add_modifier(Modifier::BOLD)
    } else {
        base.fg(app.theme.dim)
    };

    let label = format!(" {:<w$}  ", label, w = label_width);
    let room = width.saturating_sub(unicode::display_width(&label) + 1);
    let mut spans = vec![Span::styled(label, label_style)];
    if value.is_empty() {
        spans.push(Span::styled(
            truncate_to_width(hint, room),
            base.fg(app.theme.dim).add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::styled(
            truncate_to_width(value, room),
            base.fg(app.theme.text),
        ));
    }
    if editing {
        spans.push(Span::styled("\u{258C}", base.fg(app.theme.highlight))); // ▌ cursor
    }
    let used = spans_width(&spans);
    if selected && used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}
