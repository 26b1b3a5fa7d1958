use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::index::IndexNode;
use crate::tui::app::{App, Focus, SidebarRow};
use crate::util::unicode::{display_width, truncate_to_width};

/// Scroll the sidebar so the cursor row is visible in `height` rows.
pub fn follow_cursor(app: &mut App, height: usize) {
    if height == 0 {
        return;
    }
    if app.sidebar_cursor < app.sidebar_scroll {
        app.sidebar_scroll = app.sidebar_cursor;
    } else if app.sidebar_cursor >= app.sidebar_scroll + height {
        app.sidebar_scroll = app.sidebar_cursor + 1 - height;
    }
}

/// Render the derived forest as an indented, collapsible list
pub fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let rows = app.sidebar_rows();
    let open = app.ctl.state().open_entity();

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.sidebar_scroll)
        .take(area.height as usize)
        .filter_map(|(i, row)| {
            let node = app.ctl.index().node_at(&row.path)?;
            let is_open = open.is_some() && node.entity() == open;
            Some(render_row(app, row, node, i == app.sidebar_cursor, is_open, width))
        })
        .collect();

    if lines.is_empty() {
        let empty = Paragraph::new(" No notes").style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn render_row<'a>(
    app: &App,
    row: &SidebarRow,
    node: &IndexNode,
    is_cursor: bool,
    is_open: bool,
    width: usize,
) -> Line<'a> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let base = Style::default().bg(bg);

    let marker = match (row.expandable, row.expanded) {
        (true, true) => "\u{25BE} ",  // ▾
        (true, false) => "\u{25B8} ", // ▸
        _ => "  ",
    };
    let prefix = format!(" {}{}", "  ".repeat(row.depth), marker);

    let (label, fg) = match node {
        IndexNode::Tag { name, .. } => (format!("#{}", name), app.theme.tag_color(name)),
        IndexNode::Task(task) => {
            let check = if task.completed { "[x]" } else { "[ ]" };
            let fg = if task.completed {
                app.theme.dim
            } else {
                app.theme.text
            };
            (format!("{} {}", check, task.title), fg)
        }
        IndexNode::Folder { .. } | IndexNode::TaskGroup { .. } | IndexNode::TagGroup { .. } => {
            (node.label().to_string(), app.theme.text_bright)
        }
        _ if is_open => (node.label().to_string(), app.theme.highlight),
        _ => (node.label().to_string(), app.theme.text),
    };

    let mut label_style = base.fg(fg);
    if row.depth == 0 || (is_cursor && app.focus == Focus::Sidebar) {
        label_style = label_style.add_modifier(Modifier::BOLD);
    }

    let room = width.saturating_sub(display_width(&prefix));
    let label = truncate_to_width(&label, room);
    let used = display_width(&prefix) + display_width(&label);

    let mut spans = vec![
        Span::styled(prefix, base.fg(app.theme.dim)),
        Span::styled(label, label_style),
    ];
    if is_cursor && used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use insta::assert_debug_snapshot;

    #[test]
    fn renders_sections_with_markers() {
        let (_dir, app) = app_with_notes(&[("work/plan.md", "#Plan"), ("inbox.md", "")]);
        let output = render_to_string(30, 8, |frame, area| {
            render_sidebar(frame, &app, area);
        });
        assert_debug_snapshot!(output.lines().collect::<Vec<_>>(), @r#"
        [
            " ▾ Notes",
            "   ▸ work",
            "     inbox.md",
            "   Tasks",
            " ▸ Tags",
        ]
        "#);
    }

    #[test]
    fn tags_show_with_hash() {
        let (_dir, mut app) = app_with_notes(&[("plan.md", "#Plan #later")]);
        app.expanded.insert("tags".into());
        let output = render_to_string(30, 8, |frame, area| {
            render_sidebar(frame, &app, area);
        });
        assert!(output.contains("#later"));
        assert!(output.contains("#Plan"));
    }

    #[test]
    fn long_labels_are_truncated() {
        let (_dir, app) = app_with_notes(&[("a-very-long-note-name-indeed.md", "")]);
        let output = render_to_string(16, 4, |frame, area| {
            render_sidebar(frame, &app, area);
        });
        for line in output.lines() {
            assert!(display_width(line) <= 16);
        }
    }

    #[test]
    fn follow_cursor_scrolls_both_ways() {
        let (_dir, mut app) = app_with_notes(&[]);
        app.sidebar_cursor = 12;
        follow_cursor(&mut app, 5);
        assert_eq!(app.sidebar_scroll, 8);
        app.sidebar_cursor = 3;
        follow_cursor(&mut app, 5);
        assert_eq!(app.sidebar_scroll, 3);
    }
}
