// Markdown rendering for message content
//
// Converts message text into wrapped, styled ratatui Lines. The renderer is a
// single pass over pulldown-cmark events feeding a LineWriter that tracks the
// current line, the active inline styles and the block prefixes (quotes,
// list markers) every new line has to start with.
//
// Supports: headings, paragraphs, emphasis, strikethrough, inline code,
// fenced/indented code blocks, nested lists, blockquotes, links, rules.

use crate::theme::Theme;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Render markdown into lines no wider than `width` (code blocks excepted)
///
/// Sanitizes input to remove control characters that can cause TUI artifacts.
pub fn render_markdown(markdown: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let sanitized = sanitize_for_tui(markdown);
    let mut writer = LineWriter::new(width.max(1), Style::default().fg(theme.foreground));
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut code_block: Option<String> = None;

    let options = Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(&sanitized, options) {
        match event {
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => writer.end_block(),

            Event::Start(Tag::Heading { .. }) => {
                writer.flush();
                writer.push_style(
                    Style::default()
                        .fg(theme.heading)
                        .add_modifier(Modifier::BOLD),
                );
            }
            Event::End(TagEnd::Heading(_)) => {
                writer.pop_style();
                writer.end_block();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                writer.flush();
                code_block = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                let code = code_block.take().unwrap_or_default();
                let style = Style::default()
                    .fg(theme.code_block)
                    .add_modifier(Modifier::DIM);
                for line in code.trim_end_matches('\n').lines() {
                    writer.push_verbatim(format!("  {}", line), style);
                }
                writer.end_block();
            }
            Event::Text(text) if code_block.is_some() => {
                if let Some(code) = code_block.as_mut() {
                    code.push_str(&text);
                }
            }

            Event::Start(Tag::List(first)) => {
                writer.flush();
                lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                writer.flush();
                if lists.is_empty() {
                    writer.blank_line();
                }
            }
            Event::Start(Tag::Item) => {
                writer.flush();
                let marker = match lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{}. ", number);
                        *number += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let indent = " ".repeat(marker.width());
                writer.push_prefix(marker, indent, Style::default().fg(theme.muted));
            }
            Event::End(TagEnd::Item) => {
                writer.flush();
                writer.pop_prefix();
            }

            Event::Start(Tag::BlockQuote) => {
                writer.flush();
                writer.push_prefix("│ ", "│ ", Style::default().fg(theme.quote));
                writer.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Event::End(TagEnd::BlockQuote) => {
                writer.pop_style();
                writer.flush();
                writer.pop_prefix();
                writer.blank_line();
            }

            Event::Start(Tag::Strong) => {
                writer.push_style(Style::default().add_modifier(Modifier::BOLD))
            }
            Event::Start(Tag::Emphasis) => {
                writer.push_style(Style::default().add_modifier(Modifier::ITALIC))
            }
            Event::Start(Tag::Strikethrough) => {
                writer.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Event::Start(Tag::Link { .. }) => writer.push_style(
                Style::default()
                    .fg(theme.link)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Event::Start(Tag::Image { .. }) => {
                writer.push_style(Style::default().fg(theme.muted))
            }
            Event::End(
                TagEnd::Strong
                | TagEnd::Emphasis
                | TagEnd::Strikethrough
                | TagEnd::Link
                | TagEnd::Image,
            ) => writer.pop_style(),

            Event::Code(code) => {
                writer.push_text(&code, Some(Style::default().fg(theme.code_inline)))
            }
            Event::Text(text) => writer.push_text(&text, None),
            Event::Html(html) | Event::InlineHtml(html) => writer.push_text(&html, None),
            Event::SoftBreak => writer.push_text(" ", None),
            Event::HardBreak => writer.flush(),
            Event::Rule => {
                writer.flush();
                let rule = "─".repeat(writer.width.min(40));
                writer.push_verbatim(rule, Style::default().fg(theme.muted));
                writer.blank_line();
            }
            _ => {}
        }
    }

    writer.finish()
}

/// Prefix repeated at the start of every line inside a block
struct Prefix {
    first: String,
    rest: String,
    style: Style,
    used: bool,
}

/// Accumulates wrapped lines
struct LineWriter {
    width: usize,
    base: Style,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    line_width: usize,
    /// Whether the current line holds content beyond its prefixes
    has_content: bool,
    styles: Vec<Style>,
    prefixes: Vec<Prefix>,
}

impl LineWriter {
    fn new(width: usize, base: Style) -> Self {
        Self {
            width,
            base,
            lines: Vec::new(),
            spans: Vec::new(),
            line_width: 0,
            has_content: false,
            styles: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    fn style(&self) -> Style {
        self.styles
            .iter()
            .fold(self.base, |style, layer| style.patch(*layer))
    }

    fn push_style(&mut self, style: Style) {
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn push_prefix(&mut self, first: impl Into<String>, rest: impl Into<String>, style: Style) {
        self.prefixes.push(Prefix {
            first: first.into(),
            rest: rest.into(),
            style,
            used: false,
        });
    }

    fn pop_prefix(&mut self) {
        self.prefixes.pop();
    }

    fn start_line(&mut self) {
        if !self.spans.is_empty() {
            return;
        }
        for prefix in &mut self.prefixes {
            let text = if prefix.used {
                prefix.rest.clone()
            } else {
                prefix.used = true;
                prefix.first.clone()
            };
            self.line_width += text.width();
            self.spans.push(Span::styled(text, prefix.style));
        }
    }

    /// Append inline text, wrapping at word boundaries
    fn push_text(&mut self, text: &str, style: Option<Style>) {
        let style = match style {
            Some(extra) => self.style().patch(extra),
            None => self.style(),
        };
        for (i, word) in text.split(' ').enumerate() {
            if i > 0 {
                self.push_space(style);
            }
            if !word.is_empty() {
                self.push_word(word, style);
            }
        }
    }

    fn push_space(&mut self, style: Style) {
        if self.has_content && self.line_width < self.width {
            self.spans.push(Span::styled(" ", style));
            self.line_width += 1;
        }
    }

    fn push_word(&mut self, word: &str, style: Style) {
        self.start_line();
        let word_width = word.width();
        if self.has_content && self.line_width + word_width > self.width {
            self.trim_trailing_space();
            self.flush();
            self.start_line();
        }

        if self.line_width + word_width <= self.width {
            self.spans.push(Span::styled(word.to_string(), style));
            self.line_width += word_width;
            self.has_content = true;
            return;
        }

        // Longer than a full line: hard-split by character
        let mut chunk = String::new();
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if self.line_width + ch_width > self.width && (self.has_content || !chunk.is_empty())
            {
                self.spans.push(Span::styled(std::mem::take(&mut chunk), style));
                self.has_content = true;
                self.flush();
                self.start_line();
            }
            chunk.push(ch);
            self.line_width += ch_width;
        }
        if !chunk.is_empty() {
            self.spans.push(Span::styled(chunk, style));
            self.has_content = true;
        }
    }

    fn trim_trailing_space(&mut self) {
        if self.spans.last().is_some_and(|span| span.content == " ") {
            self.spans.pop();
            self.line_width -= 1;
        }
    }

    /// Add a pre-formatted line (code, rules)
    fn push_verbatim(&mut self, text: String, style: Style) {
        self.flush();
        self.start_line();
        self.spans.push(Span::styled(text, style));
        self.has_content = true;
        self.flush();
    }

    /// Finish the current line, if it has content
    fn flush(&mut self) {
        if self.has_content {
            self.trim_trailing_space();
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        } else {
            self.spans.clear();
        }
        self.line_width = 0;
        self.has_content = false;
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn end_block(&mut self) {
        self.flush();
        // Blocks inside list items stay tight
        if self.prefixes.is_empty() {
            self.blank_line();
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Strip characters that corrupt the terminal (ANSI escapes, CR, backspace)
pub fn sanitize_for_tui(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            // ANSI sequences are: ESC [ <params> <letter>
            '\x1b' => {
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            '\t' => result.push_str("    "),
            '\n' => result.push('\n'),
            c if c.is_control() => {}
            _ => result.push(ch),
        }
    }

    result
}
