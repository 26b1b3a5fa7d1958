use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

/// `#` plus letters, at the start of the text or after whitespace.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([A-Za-z]+)\b").unwrap());

/// Tag names in `text`, in order of first appearance.
///
/// Deduplicated case-insensitively; the first casing seen is kept.
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut seen: IndexMap<String, String> = IndexMap::new();
    for caps in TAG_RE.captures_iter(text) {
        let tag = &caps[1];
        seen.entry(tag.to_lowercase())
            .or_insert_with(|| tag.to_string());
    }
    seen.into_values().collect()
}

/// Every tag occurrence in order, duplicates included.
pub fn tag_occurrences(text: &str) -> impl Iterator<Item = &str> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Byte ranges of every tag occurrence (including the `#`), for highlighting.
pub fn tag_spans(text: &str) -> Vec<std::ops::Range<usize>> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.start() - 1..m.end())
        .collect()
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// Built-in tag palette.
pub const TAG_PALETTE: [&str; 8] = [
    "#E57373", "#F0A04B", "#D4C05A", "#7CB87F", "#4DB6AC", "#64B5F6", "#9575CD", "#F06292",
];

/// Palette slot for a tag.
///
/// The hash runs over UTF-16 code units with 32-bit wrapping arithmetic so the
/// same tag lands on the same slot everywhere tags are colored.
pub fn tag_palette_index(tag: &str, palette_len: usize) -> usize {
    if palette_len == 0 {
        return 0;
    }
    let hash = tag.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    });
    hash.unsigned_abs() as usize % palette_len
}

/// Color for a tag from the built-in palette.
pub fn tag_color(tag: &str) -> &'static str {
    TAG_PALETTE[tag_palette_index(tag, TAG_PALETTE.len())]
}
