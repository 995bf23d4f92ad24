//! # InputBox Component
//!
//! Single-line message editor with a clickable `[ Send ]` control in its top border.
//!
//! The buffer is internal state. Submission is pulled by the parent through
//! [`InputBox::take_submission`] so the text stays put when a send is refused.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const INPUT_HEIGHT: u16 = 3;
const SEND_LABEL: &str = "[ Send ]";

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Dimmed while a reply is pending.
    pub busy: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            busy: false,
        }
    }

    /// Takes the trimmed buffer for sending. Blank input is left untouched and yields `None`.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.buffer.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.buffer);
        Some(text.trim().to_string())
    }

    /// Screen cells of the `[ Send ]` control for an input box drawn in `area`.
    pub fn send_button_rect(area: Rect) -> Rect {
        let width = SEND_LABEL.width() as u16;
        // Right-aligned title sits just inside the top-right corner
        let x = (area.x + area.width).saturating_sub(width + 1).max(area.x);
        Rect::new(x, area.y, width.min(area.width), 1)
    }

    /// The tail of the buffer that fits in `width` cells, so the end is always visible.
    fn visible_tail(&self, width: usize) -> &str {
        let mut start = 0;
        while self.buffer[start..].width() > width {
            start += self.buffer[start..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
        }
        &self.buffer[start..]
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        // Leave one cell for the cursor
        let shown = self.visible_tail(inner_width.saturating_sub(1));

        let (text_style, send_style) = if self.busy {
            (
                Style::default().fg(Color::Green).add_modifier(Modifier::DIM),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Message")
            .title_top(Line::styled(SEND_LABEL, send_style).right_aligned());

        let cursor_x = area.x + 1 + shown.width() as u16;
        let input = Paragraph::new(shown.to_string()).block(block).style(text_style);
        frame.render_widget(input, area);

        if area.height > 1 {
            frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(2)), area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line editor: newlines become spaces
                self.buffer
                    .push_str(&text.replace("\r\n", " ").replace(['\n', '\r'], " "));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => self.buffer.pop().map(|_| InputEvent::ContentChanged),
            _ => None,
        }
    }
}
