//! Cursor movement and edits for the note editor pane.
//!
//! The text itself lives in the workspace state; these helpers take it by
//! reference and return the new text or cursor. Cursors are byte offsets
//! that always sit on a grapheme boundary.

use crate::util::unicode::{
    byte_offset_to_display_col, display_col_to_byte_offset, next_grapheme_boundary,
    prev_grapheme_boundary, word_boundary_left, word_boundary_right,
};

/// Cursor and viewport of the editor pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorState {
    /// Byte offset into the note text
    pub cursor: usize,
    /// First visible line
    pub scroll: usize,
    /// Display column kept while moving vertically
    pub sticky_col: Option<usize>,
}

/// Convert absolute byte offset to (line, byte col).
pub fn offset_to_pos(text: &str, offset: usize) -> (usize, usize) {
    let mut remaining = offset.min(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if remaining <= line.len() {
            return (i, remaining);
        }
        remaining -= line.len() + 1;
    }
    let line_count = text.split('\n').count();
    let last_len = text.split('\n').next_back().map_or(0, |l| l.len());
    (line_count.saturating_sub(1), last_len)
}

/// Byte offset where `line` starts, or the text length past the end.
fn line_start(text: &str, line: usize) -> usize {
    let mut offset = 0;
    for (i, l) in text.split('\n').enumerate() {
        if i == line {
            return offset;
        }
        offset += l.len() + 1;
    }
    text.len()
}

pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Line index and display column of the cursor.
pub fn cursor_line_col(text: &str, cursor: usize) -> (usize, usize) {
    let (line, col) = offset_to_pos(text, cursor);
    let start = cursor.min(text.len()) - col;
    let line_text = text[start..].split('\n').next().unwrap_or("");
    (line, byte_offset_to_display_col(line_text, col))
}

/// Snap an offset that may have gone stale (text replaced underneath)
/// back onto a char boundary inside the text.
pub fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

impl EditorState {
    pub fn reset(&mut self) {
        *self = EditorState::default();
    }

    pub fn insert(&mut self, text: &str, s: &str) -> String {
        let at = clamp_cursor(text, self.cursor);
        let mut out = String::with_capacity(text.len() + s.len());
        out.push_str(&text[..at]);
        out.push_str(s);
        out.push_str(&text[at..]);
        self.cursor = at + s.len();
        self.sticky_col = None;
        out
    }

    /// Delete the grapheme before the cursor. `None` at the start.
    pub fn backspace(&mut self, text: &str) -> Option<String> {
        let at = clamp_cursor(text, self.cursor);
        let prev = prev_grapheme_boundary(text, at)?;
        self.cursor = prev;
        self.sticky_col = None;
        Some(format!("{}{}", &text[..prev], &text[at..]))
    }

    /// Delete the grapheme under the cursor. `None` at the end.
    pub fn delete(&mut self, text: &str) -> Option<String> {
        let at = clamp_cursor(text, self.cursor);
        let next = next_grapheme_boundary(text, at)?;
        self.sticky_col = None;
        Some(format!("{}{}", &text[..at], &text[next..]))
    }

    pub fn left(&mut self, text: &str) {
        if let Some(prev) = prev_grapheme_boundary(text, clamp_cursor(text, self.cursor)) {
            self.cursor = prev;
        }
        self.sticky_col = None;
    }

    pub fn right(&mut self, text: &str) {
        if let Some(next) = next_grapheme_boundary(text, clamp_cursor(text, self.cursor)) {
            self.cursor = next;
        }
        self.sticky_col = None;
    }

    pub fn word_left(&mut self, text: &str) {
        self.cursor = word_boundary_left(text, clamp_cursor(text, self.cursor));
        self.sticky_col = None;
    }

    pub fn word_right(&mut self, text: &str) {
        self.cursor = word_boundary_right(text, clamp_cursor(text, self.cursor));
        self.sticky_col = None;
    }

    pub fn home(&mut self, text: &str) {
        let (line, _) = offset_to_pos(text, self.cursor);
        self.cursor = line_start(text, line);
        self.sticky_col = None;
    }

    pub fn end(&mut self, text: &str) {
        let (line, _) = offset_to_pos(text, self.cursor);
        let start = line_start(text, line);
        let len = text[start..].split('\n').next().map_or(0, str::len);
        self.cursor = start + len;
        self.sticky_col = None;
    }

    /// Move `lines` up (negative) or down, keeping the display column.
    pub fn vertical(&mut self, text: &str, lines: isize) {
        let (line, col) = cursor_line_col(text, self.cursor);
        let col = *self.sticky_col.get_or_insert(col);
        let last = line_count(text).saturating_sub(1);
        let target = line.saturating_add_signed(lines).min(last);
        if target == line {
            return;
        }
        let start = line_start(text, target);
        let line_text = text[start..].split('\n').next().unwrap_or("");
        self.cursor = start + display_col_to_byte_offset(line_text, col);
    }

    /// Scroll so the cursor line is inside a viewport of `height` lines.
    /// Returns true if the scroll offset changed.
    pub fn follow_cursor(&mut self, text: &str, height: usize) -> bool {
        if height == 0 {
            return false;
        }
        let (line, _) = offset_to_pos(text, self.cursor);
        let before = self.scroll;
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + height {
            self.scroll = line + 1 - height;
        }
        self.scroll != before
    }
}
