//! Markdown → ratatui `Text` renderer for bot replies.
//!
//! Walks `pulldown_cmark` events and emits styled lines. Covers what a chat
//! reply realistically contains: paragraphs, headings, emphasis, inline and
//! fenced code (highlighted with syntect), lists, blockquotes, links and rules.
//! Raw HTML is dropped, never interpreted.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

/// Render markdown into owned, styled text.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut builder = TextBuilder::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        builder.handle(event);
    }
    builder.finish()
}

struct TextBuilder {
    lines: Vec<Line<'static>>,
    /// Spans of the line being built.
    current: Vec<Span<'static>>,
    base_fg: Color,
    styles: Vec<Style>,
    /// Prefix for every emitted line (`│ ` per blockquote level, list indent).
    prefixes: Vec<String>,
    /// None = bullet list, Some(n) = next number of an ordered list.
    lists: Vec<Option<u64>>,
    /// Fenced code being collected: (language, body).
    code: Option<(String, String)>,
    link_url: Option<String>,
    /// A blank line separates the next block from the previous one.
    pending_gap: bool,
}

impl TextBuilder {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            base_fg,
            styles: Vec::new(),
            prefixes: Vec::new(),
            lists: Vec::new(),
            code: None,
            link_url: None,
            pending_gap: false,
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        Text::from(self.lines)
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn prefix_span(&self) -> Option<Span<'static>> {
        if self.prefixes.is_empty() {
            return None;
        }
        Some(Span::styled(
            self.prefixes.concat(),
            Style::default().fg(Color::DarkGray),
        ))
    }

    /// Ends the current line, if it has content.
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.current.len() + 1);
        spans.extend(self.prefix_span());
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn start_block(&mut self) {
        self.flush();
        if self.pending_gap && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.pending_gap = false;
    }

    fn span(&mut self, text: impl Into<String>) {
        let style = self.style();
        self.current.push(Span::styled(text.into(), style));
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(text) => {
                if let Some((_, body)) = self.code.as_mut() {
                    body.push_str(&text);
                } else {
                    self.span(text.into_string());
                }
            }
            Event::Code(code) => {
                let style = self.style().fg(Color::Yellow);
                self.current.push(Span::styled(format!("`{code}`"), style));
            }
            Event::SoftBreak => self.span(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.start_block();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(32),
                    Style::default().fg(Color::DarkGray),
                )));
                self.pending_gap = true;
            }
            Event::TaskListMarker(done) => self.span(if done { "[x] " } else { "[ ] " }),
            // Raw HTML and the rest are not rendered
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            // Inside a list item the marker is already on the current line
            Tag::Paragraph if !self.lists.is_empty() => {}
            Tag::Paragraph => self.start_block(),
            Tag::Heading { level, .. } => {
                self.start_block();
                self.push_style(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.prefixes.push("│ ".to_string());
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) => lang.split_whitespace().next().unwrap_or("").to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some((lang, String::new()));
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                } else {
                    self.flush();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                self.current.push(Span::styled(
                    format!("{indent}{marker}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.into_string());
                self.push_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                self.pending_gap = self.lists.is_empty();
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush();
                self.pending_gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.prefixes.pop();
                self.styles.pop();
                self.pending_gap = true;
            }
            TagEnd::CodeBlock => {
                if let Some((lang, body)) = self.code.take() {
                    let code_lines = highlight(&lang, &body);
                    for line in code_lines {
                        let mut spans = vec![Span::styled("  ", Style::default())];
                        spans.extend(line.spans);
                        self.lines.push(Line::from(spans));
                    }
                }
                self.pending_gap = true;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.pending_gap = true;
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.link_url.take() {
                    self.current.push(Span::styled(
                        format!(" ({url})"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => base.fg(Color::Magenta).add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => base.fg(Color::Magenta),
        _ => base,
    }
}

fn code_theme() -> Option<&'static Theme> {
    THEME_SET.themes.get(CODE_THEME)
}

/// Highlights a code block, one `Line` per source line. Unknown languages and
/// highlighter errors fall back to uniformly styled text.
fn highlight(lang: &str, body: &str) -> Vec<Line<'static>> {
    let plain = |line: &str| {
        Line::from(Span::styled(
            line.trim_end_matches('\n').to_string(),
            Style::default().fg(Color::Gray),
        ))
    };

    let syntax = SYNTAX_SET
        .find_syntax_by_token(lang)
        .filter(|_| !lang.is_empty());
    let (Some(syntax), Some(theme)) = (syntax, code_theme()) else {
        return body.lines().map(plain).collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(body)
        .map(|line| match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .map(|(style, text)| {
                        let fg = style.foreground;
                        Span::styled(
                            text.trim_end_matches('\n').to_string(),
                            Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                        )
                    })
                    .collect::<Vec<_>>(),
            ),
            Err(e) => {
                log::debug!("Highlighting failed for {:?}: {}", lang, e);
                plain(line)
            }
        })
        .collect()
}
