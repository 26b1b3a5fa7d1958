use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::NodeKind;
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;
use crate::workspace::AssetView;

use super::helpers::title_line;

/// Human-readable byte count
fn format_size(bytes: usize) -> String {
    match bytes {
        n if n < 1024 => format!("{} bytes", n),
        n if n < 1024 * 1024 => format!("{:.1} KB", n as f64 / 1024.0),
        n => format!("{:.1} MB", n as f64 / (1024.0 * 1024.0)),
    }
}

/// Render an asset: CSV files as text, anything else as a size line
pub fn render_asset_view(frame: &mut Frame, app: &App, asset: &AssetView, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let kind = match asset.kind {
        NodeKind::Pdf => "PDF",
        NodeKind::Csv => "CSV",
        _ => "Image",
    };
    let mut lines = vec![
        title_line(app, &asset.path, Some(kind)),
        Line::from(Span::styled(
            format!(" {}", format_size(asset.bytes.len())),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
        Line::from(""),
    ];

    if asset.kind == NodeKind::Csv {
        let text = String::from_utf8_lossy(&asset.bytes);
        let body = area.height.saturating_sub(lines.len() as u16) as usize;
        lines.extend(
            text.lines()
                .skip(app.asset_scroll)
                .take(body)
                .map(|row| {
                    Line::from(Span::styled(
                        truncate_to_width(&format!(" {}", row), width),
                        Style::default().fg(app.theme.text).bg(bg),
                    ))
                }),
        );
    } else {
        lines.push(Line::from(Span::styled(
            " No preview in the terminal",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
