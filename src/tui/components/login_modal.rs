//! # Login Modal
//!
//! Centered overlay that captures a display name and a "remember me" toggle.
//! Validation lives in the core; this component only edits fields and reports
//! save/cancel. The inline error (if any) is passed in as a prop.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const MODAL_WIDTH: u16 = 44;
const MODAL_HEIGHT: u16 = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum LoginEvent {
    Save { name: String, remember: bool },
    Cancel,
}

#[derive(Debug, Default)]
pub struct LoginModal {
    pub name: String,
    pub remember: bool,
    /// Inline validation error from the last save attempt (prop).
    pub error: Option<String>,
}

impl LoginModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the fields for a fresh opening.
    pub fn open(&mut self, current_name: Option<&str>, remember: bool) {
        self.name = current_name.unwrap_or_default().to_string();
        self.remember = remember;
        self.error = None;
    }

    pub fn area(frame_area: Rect) -> Rect {
        let [row] = Layout::vertical([Constraint::Length(MODAL_HEIGHT)])
            .flex(Flex::Center)
            .areas(frame_area);
        let [area] = Layout::horizontal([Constraint::Length(MODAL_WIDTH)])
            .flex(Flex::Center)
            .areas(row);
        area
    }
}

impl Component for LoginModal {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let area = Self::area(area);
        let dim = Style::default().fg(Color::DarkGray);

        let checkbox = if self.remember { "[x]" } else { "[ ]" };
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Name: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(self.name.clone()),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ]),
            Line::from(format!("{checkbox} Remember my name")),
            Line::default(),
        ];
        match &self.error {
            Some(error) => lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red))),
            None => lines.push(Line::default()),
        }
        lines.push(Line::styled("Enter save · Tab remember · Esc cancel", dim));

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Log in")
            .border_style(Style::default().fg(Color::Cyan));

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl EventHandler for LoginModal {
    type Event = LoginEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.name.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                self.name.push_str(text.lines().next().unwrap_or_default());
                None
            }
            TuiEvent::Backspace => {
                self.name.pop();
                None
            }
            TuiEvent::Tab => {
                self.remember = !self.remember;
                None
            }
            TuiEvent::Submit => Some(LoginEvent::Save {
                name: self.name.clone(),
                remember: self.remember,
            }),
            TuiEvent::Escape => Some(LoginEvent::Cancel),
            _ => None,
        }
    }
}
