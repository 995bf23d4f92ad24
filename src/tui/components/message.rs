use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{Entry, EntryKind, Sender};
use crate::tui::formatter::{self, Formatter};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// The fixed image that marks bot entries: a glyph and a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub glyph: String,
    pub name: String,
}

impl Avatar {
    pub fn label(&self) -> String {
        format!("{} {}", self.glyph, self.name)
    }
}

/// What the message list needs to turn an entry into a widget.
pub struct RenderContext<'a> {
    pub formatter: Formatter,
    pub avatar: &'a Avatar,
    pub user_name: Option<&'a str>,
    pub spinner_frame: usize,
}

/// One transcript entry, formatted and ready to draw.
///
/// Created fresh each frame; holds no state. User text is always inserted
/// literally, bot text goes through the configured [`Formatter`].
pub struct Message {
    text: Text<'static>,
    title: String,
    style: Style,
}

impl Message {
    pub fn new(entry: &Entry, ctx: &RenderContext<'_>) -> Self {
        let time = entry.sent_at.format("%H:%M");
        match &entry.kind {
            EntryKind::Message {
                sender: Sender::User,
                content,
            } => {
                let style = source_style(Some(Sender::User));
                Self {
                    text: formatter::literal(content.trim(), Color::Green),
                    title: format!("{} · {}", ctx.user_name.unwrap_or("you"), time),
                    style,
                }
            }
            EntryKind::Message {
                sender: Sender::Bot,
                content,
            } => Self {
                text: ctx.formatter.format(content.trim(), Color::Blue),
                title: format!("{} · {}", ctx.avatar.label(), time),
                style: source_style(Some(Sender::Bot)),
            },
            EntryKind::Typing => {
                let style = source_style(None);
                let dots = ".".repeat(ctx.spinner_frame % 3 + 1);
                Self {
                    text: Text::styled(format!("typing{dots}"), style),
                    title: ctx.avatar.label(),
                    style,
                }
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rendered height at `width`, borders included.
    pub fn height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy a row
            return 1;
        }
        if self.text.lines.is_empty() {
            return VERTICAL_OVERHEAD;
        }
        let lines = u16::try_from(self.paragraph().line_count(content_width)).unwrap_or(u16::MAX);
        lines.max(1).saturating_add(VERTICAL_OVERHEAD)
    }

    fn paragraph(&self) -> Paragraph<'static> {
        Paragraph::new(self.text.clone()).wrap(Wrap { trim: false })
    }
}

impl Widget for Message {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = self.style.add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .title(self.title.clone())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);
        self.paragraph().render(inner_area, buf);
    }
}

fn source_style(sender: Option<Sender>) -> Style {
    match sender {
        Some(Sender::User) => Style::default().fg(Color::Green),
        Some(Sender::Bot) => Style::default().fg(Color::Blue),
        None => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}
