pub mod asset_view;
mod helpers;
pub mod note_view;
pub mod results_overlay;
pub mod settings_view;
pub mod sidebar;
pub mod status_row;
pub mod summary_view;
pub mod task_form;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::workspace::{Pane, Surface};

use super::app::{App, InputMode, PaneGeometry};

/// Split the content row into sidebar and surface. The sidebar width is
/// stored in pixels, so it is scaled down to terminal columns.
fn split_content(app: &App, area: Rect) -> (Rect, Rect) {
    let wanted = (app.ctl.settings().sidebar_width / 10).max(12) as u16;
    let sidebar = wanted.min(area.width / 2);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar), Constraint::Min(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Update scroll offsets and pane geometry for this frame's areas.
fn prepare(app: &mut App, sidebar_height: usize, surface: Rect) {
    sidebar::follow_cursor(app, sidebar_height);

    let Surface::Note(note) = app.ctl.surface() else {
        app.panes = PaneGeometry::default();
        return;
    };
    app.panes = note_view::pane_geometry(note, &app.theme, surface);
    if let Some(editor) = app.panes.editor {
        app.editor.follow_cursor(&note.text, editor.height as usize);
    }
    let max_preview = app.pane_metrics(Pane::Preview).max_scroll() as usize;
    app.preview_scroll = app.preview_scroll.min(max_preview);
}

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let (sidebar_area, surface_area) = split_content(app, chunks[0]);
    let border = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    let sidebar_inner = border.inner(sidebar_area);

    prepare(app, sidebar_inner.height as usize, surface_area);

    frame.render_widget(border, sidebar_area);
    sidebar::render_sidebar(frame, app, sidebar_inner);

    // Clone the surface to avoid borrowing app across the renderers
    let surface = app.ctl.surface().clone();
    match &surface {
        Surface::Summary(view) => {
            summary_view::render_summary_view(frame, app, view, surface_area)
        }
        Surface::Note(note) => note_view::render_note_view(frame, app, note, surface_area),
        Surface::Task(task) => task_form::render_task_form(frame, app, task, surface_area),
        Surface::Asset(asset) => asset_view::render_asset_view(frame, app, asset, surface_area),
        Surface::Settings(view) => {
            settings_view::render_settings_view(frame, app, view, surface_area)
        }
    }

    if app.input == InputMode::Results {
        results_overlay::render_results_overlay(frame, app, chunks[0]);
    }

    status_row::render_status_row(frame, app, chunks[1]);
}
