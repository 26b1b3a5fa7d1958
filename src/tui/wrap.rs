use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::util::unicode::display_width;

/// Split `line` into byte ranges that each fit in `width` cells.
///
/// Breaks after whitespace; a word wider than the line is broken between
/// graphemes. Whitespace at a break stays on the upper row. An empty line
/// gives one empty range.
pub fn wrap_ranges(line: &str, width: usize) -> Vec<Range<usize>> {
    if width == 0 || display_width(line) <= width {
        return vec![0..line.len()];
    }

    let mut rows = Vec::new();
    let mut start = 0;
    let mut col = 0;
    // Byte offset just after the last whitespace on the current row
    let mut last_break: Option<usize> = None;

    for (i, g) in line.grapheme_indices(true) {
        let w = display_width(g);
        let is_ws = g.chars().all(char::is_whitespace);
        if col + w > width && !is_ws {
            let end = match last_break {
                Some(b) if b > start => b,
                _ => i,
            };
            if end > start {
                rows.push(start..end);
                start = end;
                col = display_width(&line[start..i]);
            }
            last_break = None;
        }
        col += w;
        if is_ws {
            last_break = Some(i + g.len());
        }
    }
    rows.push(start..line.len());
    rows
}
