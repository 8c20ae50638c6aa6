use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use super::style::{Inline, Style, StyledLine, StyledSpan, Tone};

/// Parses message markup into styled lines.
///
/// Newlines in the source are kept (soft breaks become line breaks), so the
/// output follows the message's own line structure. Unclosed markup, as seen
/// mid-reveal, is rendered literally by the markdown parser; unclosed HTML
/// tags simply style the remainder of the text.
///
/// Empty text yields no lines.
pub fn parse_lines(text: &str, tone: Tone) -> Vec<StyledLine> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let mut builder = LineBuilder::new(tone);
    for event in Parser::new_ext(text, options) {
        builder.process_event(event);
    }
    builder.finish()
}

/// Open counts of HTML-driven marks; tags may close in any order.
#[derive(Debug, Default)]
struct HtmlMarks {
    bold: u16,
    italic: u16,
    code: u16,
    mark: u16,
    strike: u16,
    underline: u16,
    link: u16,
}

impl HtmlMarks {
    fn counter(&mut self, name: &str) -> Option<&mut u16> {
        match name {
            "b" | "strong" => Some(&mut self.bold),
            "i" | "em" | "cite" => Some(&mut self.italic),
            "code" | "kbd" | "tt" | "samp" => Some(&mut self.code),
            "mark" => Some(&mut self.mark),
            "s" | "del" | "strike" => Some(&mut self.strike),
            "u" | "ins" => Some(&mut self.underline),
            "a" => Some(&mut self.link),
            _ => None,
        }
    }

    fn inline(&self) -> Inline {
        Inline {
            bold: self.bold > 0,
            italic: self.italic > 0,
            code: self.code > 0,
            mark: self.mark > 0,
            strike: self.strike > 0,
            underline: self.underline > 0,
            link: self.link > 0,
        }
    }
}

struct LineBuilder {
    tone: Tone,
    lines: Vec<StyledLine>,
    current: Vec<StyledSpan>,
    /// Marks opened by markdown constructs.
    stack: Vec<Inline>,
    html: HtmlMarks,
    list_depth: usize,
}

impl LineBuilder {
    fn new(tone: Tone) -> Self {
        Self {
            tone,
            lines: Vec::new(),
            current: Vec::new(),
            stack: Vec::new(),
            html: HtmlMarks::default(),
            list_depth: 0,
        }
    }

    fn inline(&self) -> Inline {
        self.stack
            .last()
            .copied()
            .unwrap_or_default()
            .union(self.html.inline())
    }

    fn push_mark(&mut self, apply: impl FnOnce(&mut Inline)) {
        let mut inline = self.stack.last().copied().unwrap_or_default();
        apply(&mut inline);
        self.stack.push(inline);
    }

    fn pop_mark(&mut self) {
        self.stack.pop();
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => {
                let inline = Inline {
                    code: true,
                    ..self.inline()
                };
                self.push_span(&code, inline);
            }
            Event::SoftBreak | Event::HardBreak => self.break_line(),
            Event::Html(html) | Event::InlineHtml(html) => self.add_html(&html),
            Event::Rule => {
                self.start_block();
                self.current.push(StyledSpan::new("───", Style::Bullet));
                self.break_line();
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => {
                if self.list_depth == 0 {
                    self.start_block();
                }
            }
            Tag::Heading { .. } => {
                self.start_block();
                self.push_mark(|i| i.bold = true);
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.push_mark(|i| i.italic = true);
            }
            Tag::CodeBlock(_) => {
                self.start_block();
                self.push_mark(|i| i.code = true);
            }
            Tag::List(_) => {
                if self.list_depth == 0 {
                    self.start_block();
                }
                self.list_depth += 1;
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.current
                    .push(StyledSpan::new(format!("{indent}• "), Style::Bullet));
            }
            Tag::Emphasis => self.push_mark(|i| i.italic = true),
            Tag::Strong => self.push_mark(|i| i.bold = true),
            Tag::Strikethrough => self.push_mark(|i| i.strike = true),
            Tag::Link { .. } => self.push_mark(|i| i.link = true),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Item => self.flush_line(),
            TagEnd::Heading(_) | TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.pop_mark();
            }
            TagEnd::CodeBlock => {
                // Code block text ends with its own newline.
                if !self.current.is_empty() {
                    self.flush_line();
                }
                self.pop_mark();
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_mark();
            }
            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        let inline = self.inline();
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            self.push_span(part, inline);
            if parts.peek().is_some() {
                self.break_line();
            }
        }
    }

    /// Applies the tags in an HTML fragment; any text between tags is kept.
    fn add_html(&mut self, html: &str) {
        let mut rest = html;
        while let Some(open) = rest.find('<') {
            let (text, tail) = rest.split_at(open);
            self.add_text(text);
            let Some(close) = tag_end(tail) else {
                rest = tail;
                break;
            };
            self.apply_tag(&tail[1..close]);
            rest = &tail[close + 1..];
        }
        // Trailing block-level HTML ends with a newline that is not content.
        self.add_text(rest.trim_end_matches('\n'));
    }

    fn apply_tag(&mut self, raw: &str) {
        let raw = raw.trim();
        let (closing, body) = match raw.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, raw),
        };
        let self_closing = body.ends_with('/');
        let name = body
            .trim_end_matches('/')
            .split(|c: char| c.is_whitespace())
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match name.as_str() {
            "br" => self.break_line(),
            "p" | "div" if closing => self.flush_line(),
            _ => {
                if self_closing {
                    return;
                }
                if let Some(count) = self.html.counter(&name) {
                    *count = if closing {
                        count.saturating_sub(1)
                    } else {
                        count.saturating_add(1)
                    };
                }
            }
        }
    }

    fn push_span(&mut self, text: &str, inline: Inline) {
        if text.is_empty() {
            return;
        }
        let style = Style::Body {
            tone: self.tone,
            inline,
        };
        if let Some(last) = self.current.last_mut()
            && last.style == style
        {
            last.text.push_str(text);
            return;
        }
        self.current.push(StyledSpan::new(text, style));
    }

    /// Separates a new block from previous output with one blank line.
    fn start_block(&mut self) {
        self.flush_line();
        if !self.lines.is_empty() {
            self.lines.push(StyledLine::empty());
        }
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(StyledLine::from_spans(spans));
        }
    }

    fn break_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(StyledLine::from_spans(spans));
    }

    fn finish(mut self) -> Vec<StyledLine> {
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Byte offset of the `>` closing the tag that starts `tag`, skipping any
/// `>` inside a quoted attribute value.
fn tag_end(tag: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in tag.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}
