use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Focus, InputMode};
use crate::tui::forms::{TASK_FIELDS, TaskField};
use crate::workspace::TaskView;

use super::helpers::{form_row, title_line};

const LABEL_WIDTH: usize = 9;

/// Render the task form: one row per field, notes continue below
pub fn render_task_form(frame: &mut Frame, app: &App, task: &TaskView, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let focused = app.focus == Focus::Content && app.input == InputMode::Navigate;

    let title = if task.id.is_some() { "Task" } else { "New task" };
    let dirty = app.ctl.is_dirty().then_some("modified");
    let mut lines = vec![title_line(app, title, dirty), Line::from("")];

    for (i, field) in TASK_FIELDS.iter().enumerate() {
        let selected = i == app.form_field;
        let text_field = !matches!(field, TaskField::Priority | TaskField::Completed);
        let value = field.value(&task.draft);
        let mut value_lines = value.split('\n');
        let first = value_lines.next().unwrap_or_default();

        lines.push(form_row(
            app,
            field.label(),
            LABEL_WIDTH,
            first,
            field.hint(),
            selected,
            selected && focused && text_field && *field != TaskField::Notes,
            width,
        ));
        if *field == TaskField::Notes {
            let indent = " ".repeat(LABEL_WIDTH + 3);
            for more in value_lines {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", indent, more),
                    Style::default().fg(app.theme.text).bg(bg),
                )));
            }
        }
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
