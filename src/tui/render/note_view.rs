use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Layout;
use crate::ops::markdown::{InlineStyle, LineKind, render_preview_lines};
use crate::ops::tags::tag_spans;
use crate::tui::app::{App, Focus, InputMode, PaneGeometry};
use crate::tui::editor::{cursor_line_col, line_count};
use crate::tui::theme::Theme;
use crate::tui::wrap::wrap_ranges;
use crate::util::unicode::{
    clip_to_width, display_col_to_byte_offset, display_width, truncate_to_width,
};
use crate::workspace::NoteView;

/// Rows above the panes: path + layout selector, then tags
const HEADER_ROWS: u16 = 2;

/// Where the editor and preview go inside the note surface.
fn body_panes(area: Rect, layout: Layout) -> (Option<Rect>, Option<Rect>) {
    let body = Rect::new(
        area.x,
        area.y + HEADER_ROWS.min(area.height),
        area.width,
        area.height.saturating_sub(HEADER_ROWS),
    );
    let inset = |r: Rect| Rect::new(r.x + 1, r.y, r.width.saturating_sub(1), r.height);
    match layout {
        Layout::Edit => (Some(inset(body)), None),
        Layout::Preview => (None, Some(inset(body))),
        Layout::Split => {
            let left = body.width / 2;
            let editor = Rect::new(body.x, body.y, left, body.height);
            // One column between the panes holds the separator
            let preview = Rect::new(
                body.x + left + 1,
                body.y,
                body.width.saturating_sub(left + 1),
                body.height,
            );
            (Some(inset(editor)), Some(inset(preview)))
        }
    }
}

/// Pane rectangles and content heights for a note rendered into `area`.
pub fn pane_geometry(note: &NoteView, theme: &Theme, area: Rect) -> PaneGeometry {
    let (editor, preview) = body_panes(area, note.layout);
    PaneGeometry {
        editor,
        preview,
        editor_lines: editor.map_or(0, |_| line_count(&note.text)),
        preview_lines: preview.map_or(0, |r| {
            preview_rows(theme, &note.text, r.width as usize).len()
        }),
    }
}

pub fn render_note_view(frame: &mut Frame, app: &App, note: &NoteView, area: Rect) {
    let bg = app.theme.background;
    if area.height == 0 {
        return;
    }

    let header = Rect::new(area.x, area.y, area.width, 1);
    frame.render_widget(Paragraph::new(header_line(app, note, area.width)), header);

    if area.height > 1 {
        let tags = Rect::new(area.x, area.y + 1, area.width, 1);
        frame.render_widget(Paragraph::new(tags_line(app, note)), tags);
    }

    if let Some(editor) = app.panes.editor {
        render_editor(frame, app, note, editor);
    }
    if let Some(preview) = app.panes.preview {
        let rows: Vec<Line> = preview_rows(&app.theme, &note.text, preview.width as usize)
            .into_iter()
            .skip(app.preview_scroll)
            .take(preview.height as usize)
            .collect();
        frame.render_widget(Paragraph::new(rows).style(Style::default().bg(bg)), preview);
    }
    if let (Some(editor), Some(_)) = (app.panes.editor, app.panes.preview) {
        // The separator sits in the column left of the preview inset
        let sep = Rect::new(editor.x + editor.width, editor.y, 1, editor.height);
        let bar: Vec<Line> = (0..sep.height)
            .map(|_| Line::from(Span::styled("\u{2502}", Style::default().fg(app.theme.dim))))
            .collect();
        frame.render_widget(Paragraph::new(bar).style(Style::default().bg(bg)), sep);
    }
}

fn header_line(app: &App, note: &NoteView, width: u16) -> Line<'static> {
    let bg = app.theme.background;
    let selector: Vec<(Layout, &str)> = vec![
        (Layout::Edit, "1 Edit"),
        (Layout::Preview, "2 Preview"),
        (Layout::Split, "3 Split"),
    ];
    let selector_width: usize = selector.iter().map(|(_, l)| l.len() + 3).sum();

    let path = truncate_to_width(
        &format!(" {}", note.path),
        (width as usize).saturating_sub(selector_width),
    );
    let pad = (width as usize).saturating_sub(display_width(&path) + selector_width);

    let mut spans = vec![
        Span::styled(
            path,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(pad), Style::default().bg(bg)),
    ];
    for (layout, label) in selector {
        let style = if layout == note.layout {
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled(format!(" {} ", label), style));
    }
    Line::from(spans)
}

fn tags_line(app: &App, note: &NoteView) -> Line<'static> {
    let bg = app.theme.background;
    if note.tags.is_empty() {
        return Line::from(Span::styled(
            " no tags",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    let mut spans = Vec::new();
    for tag in &note.tags {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled(
            format!("#{}", tag),
            Style::default().fg(app.theme.tag_color(tag)).bg(bg),
        ));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

fn render_editor(frame: &mut Frame, app: &App, note: &NoteView, area: Rect) {
    let width = area.width as usize;
    let (cursor_line, cursor_col) = cursor_line_col(&note.text, app.editor.cursor);
    // Lines are not wrapped; shift left when the cursor runs off the edge
    let hscroll = (cursor_col + 1).saturating_sub(width);

    let lines: Vec<Line> = note
        .text
        .split('\n')
        .skip(app.editor.scroll)
        .take(area.height as usize)
        .map(|line| editor_line(&app.theme, line, hscroll, width))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        area,
    );

    let editing = app.focus == Focus::Content && app.input == InputMode::Navigate;
    if editing && cursor_line >= app.editor.scroll {
        let row = cursor_line - app.editor.scroll;
        if row < area.height as usize {
            frame.set_cursor_position(Position::new(
                area.x + (cursor_col - hscroll) as u16,
                area.y + row as u16,
            ));
        }
    }
}

/// One editor row with tags colored, starting `hscroll` cells in.
fn editor_line(theme: &Theme, line: &str, hscroll: usize, width: usize) -> Line<'static> {
    let start = display_col_to_byte_offset(line, hscroll);
    let base = Style::default().fg(theme.text).bg(theme.background);

    let mut pieces: Vec<(usize, usize, Style)> = Vec::new();
    let mut pos = 0;
    for range in tag_spans(line) {
        if range.start > pos {
            pieces.push((pos, range.start, base));
        }
        let color = theme.tag_color(&line[range.start + 1..range.end]);
        pieces.push((range.start, range.end, base.fg(color)));
        pos = range.end;
    }
    if pos < line.len() {
        pieces.push((pos, line.len(), base));
    }

    let mut room = width;
    let mut spans = Vec::new();
    for (from, to, style) in pieces {
        let from = from.max(start);
        if from >= to || room == 0 {
            continue;
        }
        let text = clip_to_width(&line[from..to], room);
        room -= display_width(text);
        spans.push(Span::styled(text.replace('\t', "    "), style));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

fn inline_style(theme: &Theme, base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    if inline.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strike {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.code {
        style = style.fg(theme.code);
    }
    if inline.link {
        style = style.fg(theme.highlight).add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Render markdown into screen rows wrapped to `width`.
pub fn preview_rows(theme: &Theme, text: &str, width: usize) -> Vec<Line<'static>> {
    let bg = Style::default().bg(theme.background);
    let mut rows = Vec::new();

    for line in render_preview_lines(text) {
        let mut segments: Vec<(String, Style)> = Vec::new();
        if line.quote > 0 {
            segments.push(("\u{2502} ".repeat(line.quote), bg.fg(theme.dim)));
        }
        let base = match line.kind {
            LineKind::Heading(1) => bg
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            LineKind::Heading(_) => bg.fg(theme.highlight).add_modifier(Modifier::BOLD),
            LineKind::Code => bg.fg(theme.code),
            _ => bg.fg(theme.text),
        };
        match line.kind {
            LineKind::Rule => {
                let used: usize = segments.iter().map(|(s, _)| display_width(s)).sum();
                segments.push((
                    "\u{2500}".repeat(width.saturating_sub(used)),
                    bg.fg(theme.dim),
                ));
            }
            LineKind::Blank => {}
            _ => {
                for span in &line.spans {
                    segments.push((span.text.clone(), inline_style(theme, base, span.style)));
                }
            }
        }
        rows.extend(wrap_styled(&segments, width));
    }
    rows
}

/// Wrap styled segments as one line, keeping each piece's style.
fn wrap_styled(segments: &[(String, Style)], width: usize) -> Vec<Line<'static>> {
    let text: String = segments.iter().map(|(s, _)| s.as_str()).collect();
    let mut bounds = Vec::with_capacity(segments.len());
    let mut pos = 0;
    for (s, style) in segments {
        bounds.push((pos, pos + s.len(), *style));
        pos += s.len();
    }

    wrap_ranges(&text, width)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = bounds
                .iter()
                .filter_map(|&(start, end, style)| {
                    let from = start.max(row.start);
                    let to = end.min(row.end);
                    (from < to).then(|| Span::styled(text[from..to].to_string(), style))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
