use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render markdown to HTML. The output is not sanitised.
pub fn render_html(text: &str) -> String {
    let parser = Parser::new_ext(text, parser_options());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

// ---------------------------------------------------------------------------
// Terminal preview
// ---------------------------------------------------------------------------

/// Block-level role of a preview line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(u8),
    Text,
    Code,
    Rule,
    Blank,
}

/// Inline styling flags for a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub code: bool,
    pub link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSpan {
    pub text: String,
    pub style: InlineStyle,
}

/// One rendered line of the preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub kind: LineKind,
    /// Block quote nesting depth
    pub quote: usize,
    pub spans: Vec<PreviewSpan>,
}

impl PreviewLine {
    fn new(kind: LineKind, quote: usize) -> Self {
        PreviewLine {
            kind,
            quote,
            spans: Vec::new(),
        }
    }

    /// Plain text of the line, without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Render markdown into styled lines for a terminal preview.
///
/// Links show as `text <url>`. Consecutive blank lines are collapsed and a
/// trailing blank line is dropped.
pub fn render_preview_lines(text: &str) -> Vec<PreviewLine> {
    let mut builder = PreviewBuilder::default();
    for event in Parser::new_ext(text, parser_options()) {
        builder.event(event);
    }
    builder.finish()
}

#[derive(Default)]
struct PreviewBuilder {
    lines: Vec<PreviewLine>,
    current: Option<PreviewLine>,
    style: InlineStyle,
    bold: usize,
    italic: usize,
    strike: usize,
    links: Vec<String>,
    /// One entry per open list: next ordinal, or `None` for bullets
    lists: Vec<Option<u64>>,
    quote_ends: Vec<TagEnd>,
    heading: Option<u8>,
    in_code: bool,
    in_table_row: bool,
}

impl PreviewBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(end) => self.end(end),
            Event::Text(text) => {
                if self.in_code {
                    self.code_text(&text);
                } else {
                    self.push_text(&text, self.style);
                }
            }
            Event::Code(code) => {
                let style = InlineStyle {
                    code: true,
                    ..self.style
                };
                self.push_text(&code, style);
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                let raw = raw.trim_end_matches('\n');
                if !raw.is_empty() {
                    self.push_text(raw, self.style);
                }
            }
            Event::SoftBreak => self.push_text(" ", self.style),
            Event::HardBreak => {
                let kind = self.current.as_ref().map_or(LineKind::Text, |l| l.kind);
                self.flush();
                self.open(kind);
            }
            Event::Rule => {
                self.flush();
                self.lines
                    .push(PreviewLine::new(LineKind::Rule, self.quote_ends.len()));
                self.blank();
            }
            Event::TaskListMarker(done) => {
                self.push_text(if done { "[x] " } else { "[ ] " }, self.style);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let end = tag.to_end();
        match tag {
            Tag::Paragraph => {
                if self.current.is_none() {
                    self.open(LineKind::Text);
                }
            }
            Tag::Heading { level, .. } => {
                self.flush();
                let level = level as u8;
                self.heading = Some(level);
                self.open(LineKind::Heading(level));
            }
            Tag::BlockQuote(..) => {
                self.flush();
                self.quote_ends.push(end);
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.in_code = true;
                if let CodeBlockKind::Fenced(lang) = kind
                    && !lang.is_empty()
                {
                    let mut line = PreviewLine::new(LineKind::Code, self.quote_ends.len());
                    line.spans.push(PreviewSpan {
                        text: format!("[{}]", lang),
                        style: InlineStyle {
                            italic: true,
                            ..InlineStyle::default()
                        },
                    });
                    self.lines.push(line);
                }
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.open(LineKind::Text);
                self.push_text(&format!("{}{}", "  ".repeat(depth), marker), InlineStyle::default());
            }
            Tag::TableRow | Tag::TableHead => {
                self.flush();
                self.in_table_row = true;
                self.open(LineKind::Text);
                self.push_text("| ", InlineStyle::default());
            }
            Tag::Emphasis => {
                self.italic += 1;
                self.restyle();
            }
            Tag::Strong => {
                self.bold += 1;
                self.restyle();
            }
            Tag::Strikethrough => {
                self.strike += 1;
                self.restyle();
            }
            Tag::Link { dest_url, .. } => {
                self.links.push(dest_url.to_string());
                self.style.link = true;
            }
            _ => {}
        }
    }

    fn end(&mut self, end: TagEnd) {
        if self.quote_ends.last() == Some(&end) {
            self.flush();
            self.quote_ends.pop();
            self.blank();
            return;
        }
        match end {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.heading = None;
                self.blank();
            }
            TagEnd::CodeBlock => {
                self.in_code = false;
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::TableCell => {
                if self.in_table_row {
                    self.push_text(" | ", InlineStyle::default());
                }
            }
            TagEnd::TableRow | TagEnd::TableHead => {
                self.flush();
                self.in_table_row = false;
            }
            TagEnd::Table => self.blank(),
            TagEnd::Emphasis => {
                self.italic = self.italic.saturating_sub(1);
                self.restyle();
            }
            TagEnd::Strong => {
                self.bold = self.bold.saturating_sub(1);
                self.restyle();
            }
            TagEnd::Strikethrough => {
                self.strike = self.strike.saturating_sub(1);
                self.restyle();
            }
            TagEnd::Link => {
                self.style.link = false;
                if let Some(url) = self.links.pop()
                    && !url.is_empty()
                {
                    self.push_text(&format!(" <{}>", url), InlineStyle::default());
                }
            }
            _ => {}
        }
    }

    fn restyle(&mut self) {
        self.style.bold = self.bold > 0;
        self.style.italic = self.italic > 0;
        self.style.strike = self.strike > 0;
    }

    fn code_text(&mut self, text: &str) {
        let style = InlineStyle {
            code: true,
            ..InlineStyle::default()
        };
        for line in text.trim_end_matches('\n').split('\n') {
            let mut out = PreviewLine::new(LineKind::Code, self.quote_ends.len());
            out.spans.push(PreviewSpan {
                text: line.to_string(),
                style,
            });
            self.lines.push(out);
        }
    }

    fn open(&mut self, kind: LineKind) {
        self.current = Some(PreviewLine::new(kind, self.quote_ends.len()));
    }

    fn push_text(&mut self, text: &str, style: InlineStyle) {
        if self.current.is_none() {
            let kind = self.heading.map_or(LineKind::Text, LineKind::Heading);
            self.open(kind);
        }
        if let Some(line) = self.current.as_mut() {
            match line.spans.last_mut() {
                Some(last) if last.style == style => last.text.push_str(text),
                _ => line.spans.push(PreviewSpan {
                    text: text.to_string(),
                    style,
                }),
            }
        }
    }

    fn flush(&mut self) {
        if let Some(line) = self.current.take() {
            self.lines.push(line);
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| l.kind != LineKind::Blank) {
            self.lines
                .push(PreviewLine::new(LineKind::Blank, self.quote_ends.len()));
        }
    }

    fn finish(mut self) -> Vec<PreviewLine> {
        self.flush();
        while self.lines.last().is_some_and(|l| l.kind == LineKind::Blank) {
            self.lines.pop();
        }
        self.lines
    }
}
