use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::forms::SETTINGS_FIELDS;
use crate::workspace::SettingsView;

use super::helpers::{form_row, title_line};

const LABEL_WIDTH: usize = 18;

pub fn render_settings_view(frame: &mut Frame, app: &App, view: &SettingsView, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let changed = (view.draft != view.saved).then_some("unsaved");

    let mut lines = vec![title_line(app, "Settings", changed), Line::from("")];
    for (i, field) in SETTINGS_FIELDS.iter().enumerate() {
        lines.push(form_row(
            app,
            field.label(),
            LABEL_WIDTH,
            &field.value(&view.draft),
            field.hint(),
            i == app.form_field,
            false,
            width,
        ));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            " {}",
            app.ctl.store().root().join("settings.json").display()
        ),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
