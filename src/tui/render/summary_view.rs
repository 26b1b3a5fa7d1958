use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::index::{CreateScope, GroupRef};
use crate::tui::app::App;
use crate::workspace::SummaryView;

use super::helpers::title_line;

pub fn group_title(group: Option<&GroupRef>) -> String {
    match group {
        Some(GroupRef::Folder(path)) if path.is_empty() => "Notes".to_string(),
        Some(GroupRef::Folder(path)) => path.clone(),
        Some(GroupRef::Tasks(scope)) => scope.label().to_string(),
        Some(GroupRef::Tags) => "Tags".to_string(),
        Some(GroupRef::Tag(name)) => format!("#{}", name),
        None => "Workspace".to_string(),
    }
}

/// Render aggregate counts for the selected group
pub fn render_summary_view(frame: &mut Frame, app: &App, view: &SummaryView, area: Rect) {
    let bg = app.theme.background;
    let mut lines = vec![title_line(app, &group_title(view.group.as_ref()), None), Line::from("")];

    match &view.counts {
        Some(summary) => {
            for row in summary.describe() {
                lines.push(Line::from(Span::styled(
                    format!("   {}", row),
                    Style::default().fg(app.theme.text).bg(bg),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "   Nothing here yet",
            Style::default().fg(app.theme.dim).bg(bg),
        ))),
    }

    let actions: &[(&str, &str)] = match &view.create {
        CreateScope::Note { .. } => &[("n", "new note"), ("N", "new folder")],
        CreateScope::Task { .. } => &[("n", "new task")],
        CreateScope::Nothing => &[],
    };
    if !actions.is_empty() {
        lines.push(Line::from(""));
        let mut spans = vec![Span::styled("  ", Style::default().bg(bg))];
        for (key, label) in actions {
            spans.push(Span::styled(
                format!(" {}", key),
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}  ", label),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
