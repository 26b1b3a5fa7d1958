//! Folder templates (`default.template`) and their `{{...}}` placeholders.

use chrono::NaiveDateTime;

use crate::util::path::{file_stem, parent};

/// File name of the per-folder note template.
pub const FOLDER_TEMPLATE: &str = "default.template";

/// Values available to placeholders for one new note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    /// File name without extension
    pub title: String,
    pub path: String,
    /// Parent folder, `""` at the root
    pub folder: String,
}

impl TemplateContext {
    pub fn for_path(rel_path: &str) -> Self {
        TemplateContext {
            title: file_stem(rel_path).to_string(),
            path: rel_path.to_string(),
            folder: parent(rel_path).to_string(),
        }
    }
}

/// Expand `{{title}}`, `{{path}}`, `{{folder}}` and `{{date:FMT}}`-style
/// placeholders.
///
/// Unknown placeholders are kept as written. An unterminated `{{` and the
/// rest of the input are copied through unchanged.
pub fn apply_placeholders(input: &str, now: NaiveDateTime, ctx: &TemplateContext) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        out.push_str(&resolve_token(&after[..end], now, ctx));
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn resolve_token(token: &str, now: NaiveDateTime, ctx: &TemplateContext) -> String {
    match token {
        "title" => return ctx.title.clone(),
        "path" => return ctx.path.clone(),
        "folder" => return ctx.folder.clone(),
        _ => {}
    }
    match token.split_once(':') {
        Some(("date" | "time" | "datetime" | "day" | "year" | "month", format)) => {
            now.format(&chrono_format(format)).to_string()
        }
        _ => format!("{{{{{}}}}}", token),
    }
}

/// Translate `YYYY MM DD HH mm ss dddd ddd` tokens into a chrono format
/// string. Everything else is literal.
fn chrono_format(format: &str) -> String {
    const TOKENS: [(&str, &str); 8] = [
        ("YYYY", "%Y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;
    'outer: while let Some(c) = rest.chars().next() {
        for (token, spec) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}
