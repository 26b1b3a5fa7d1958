use ratatui::style::Color;

use crate::model::UiConfig;
use crate::ops::tags::{TAG_PALETTE, tag_palette_index};

/// Colors for every surface, picked by the workspace's dark mode setting.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    /// Focused pane border, selected layout, headings
    pub highlight: Color,
    pub dim: Color,
    /// Error messages and delete prompts
    pub error: Color,
    /// Dirty marker and "unsaved" notes
    pub unsaved: Color,
    /// Confirmation messages
    pub saved: Color,
    /// Code spans and blocks in the preview
    pub code: Color,
    pub selection_bg: Color,
    /// Colors tags are hashed onto
    pub tag_palette: Vec<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

/// `#RRGGBB` to an RGB color. Anything else is None.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let digits = s
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))?;
    let value = u32::from_str_radix(digits, 16).ok()?;
    let [_, r, g, b] = value.to_be_bytes();
    Some(Color::Rgb(r, g, b))
}

fn parse_palette<S: AsRef<str>>(entries: &[S]) -> Vec<Color> {
    entries
        .iter()
        .filter_map(|hex| parse_hex_color(hex.as_ref()))
        .collect()
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x16, 0x18, 0x1D),
            text: Color::Rgb(0xC8, 0xCC, 0xD4),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x64, 0xB5, 0xF6),
            dim: Color::Rgb(0x6B, 0x71, 0x7D),
            error: Color::Rgb(0xE5, 0x73, 0x73),
            unsaved: Color::Rgb(0xD4, 0xC0, 0x5A),
            saved: Color::Rgb(0x7C, 0xB8, 0x7F),
            code: Color::Rgb(0x4D, 0xB6, 0xAC),
            selection_bg: Color::Rgb(0x2A, 0x31, 0x3C),
            tag_palette: parse_palette(&TAG_PALETTE),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFA, 0xFA, 0xF7),
            text: Color::Rgb(0x2E, 0x32, 0x38),
            text_bright: Color::Rgb(0x00, 0x00, 0x00),
            highlight: Color::Rgb(0x1E, 0x6F, 0xC0),
            dim: Color::Rgb(0x8A, 0x8F, 0x98),
            error: Color::Rgb(0xC6, 0x28, 0x28),
            unsaved: Color::Rgb(0x9E, 0x7C, 0x00),
            saved: Color::Rgb(0x2E, 0x7D, 0x32),
            code: Color::Rgb(0x00, 0x79, 0x6B),
            selection_bg: Color::Rgb(0xE3, 0xE8, 0xF0),
            tag_palette: parse_palette(&TAG_PALETTE),
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Color> {
        Some(match name {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "error" => &mut self.error,
            "unsaved" => &mut self.unsaved,
            "saved" => &mut self.saved,
            "code" => &mut self.code,
            "selection_bg" => &mut self.selection_bg,
            _ => return None,
        })
    }

    /// Base theme for `dark_mode`, with `[ui.colors]` and `[ui].tag_palette`
    /// from the local config applied on top. Unknown slots and unparsable
    /// colors are skipped.
    pub fn from_config(ui: &UiConfig, dark_mode: bool) -> Self {
        let mut theme = if dark_mode {
            Theme::dark()
        } else {
            Theme::light()
        };

        for (name, value) in &ui.colors {
            if let (Some(slot), Some(color)) = (theme.slot_mut(name), parse_hex_color(value)) {
                *slot = color;
            }
        }

        let palette = parse_palette(&ui.tag_palette);
        if !palette.is_empty() {
            theme.tag_palette = palette;
        }
        theme
    }

    /// Palette color for a tag; text color when the palette is empty.
    pub fn tag_color(&self, tag: &str) -> Color {
        let idx = tag_palette_index(tag, self.tag_palette.len());
        self.tag_palette.get(idx).copied().unwrap_or(self.text)
    }
}
