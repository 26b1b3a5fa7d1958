//! Terminal-cell measurement over grapheme clusters.
//!
//! Offsets passed in and returned are byte offsets into the same string and
//! always land on a grapheme boundary.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const TAB_CELLS: usize = 4;
const ELLIPSIS: char = '\u{2026}';

/// Cells taken by one grapheme cluster.
fn cells(g: &str) -> usize {
    if g == "\t" {
        TAB_CELLS
    } else {
        UnicodeWidthStr::width(g)
    }
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(cells).sum()
}

/// Longest prefix of `s` that fits in `max_cells`, without a marker.
pub fn clip_to_width(s: &str, max_cells: usize) -> &str {
    &s[..display_col_to_byte_offset(s, max_cells)]
}

/// Fit `s` into `max_cells`, ending with `…` when something was cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    match max_cells {
        0 => String::new(),
        n => {
            let mut out = clip_to_width(s, n - 1).to_string();
            out.push(ELLIPSIS);
            out
        }
    }
}

/// Start of the grapheme after the one at `at`, or None at the end.
pub fn next_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let rest = s.get(at..).filter(|r| !r.is_empty())?;
    let first = rest.graphemes(true).next().map_or(0, str::len);
    Some(at + first)
}

/// Start of the grapheme before `at`, or None at the start.
pub fn prev_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    if at == 0 {
        return None;
    }
    s[..at.min(s.len())]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

/// Cells from the start of `s` up to byte `at`.
pub fn byte_offset_to_display_col(s: &str, at: usize) -> usize {
    display_width(&s[..at.min(s.len())])
}

/// Byte offset of the grapheme covering cell `col`. A column inside a wide
/// character maps to that character's start; past the end maps to `s.len()`.
pub fn display_col_to_byte_offset(s: &str, col: usize) -> usize {
    let mut used = 0;
    for (i, g) in s.grapheme_indices(true) {
        used += cells(g);
        if used > col {
            return i;
        }
    }
    s.len()
}

/// Start of the word at or before `at`, skipping whitespace first.
pub fn word_boundary_left(s: &str, at: usize) -> usize {
    let before: Vec<(usize, &str)> = s[..at.min(s.len())].grapheme_indices(true).collect();
    let mut idx = before.len();
    while idx > 0 && is_blank(before[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_blank(before[idx - 1].1) {
        idx -= 1;
    }
    before.get(idx).map_or(0, |(i, _)| *i)
}

/// Start of the next word after `at`.
pub fn word_boundary_right(s: &str, at: usize) -> usize {
    let at = at.min(s.len());
    s[at..]
        .grapheme_indices(true)
        .skip_while(|(_, g)| !is_blank(g))
        .find(|(_, g)| !is_blank(g))
        .map_or(s.len(), |(i, _)| at + i)
}
