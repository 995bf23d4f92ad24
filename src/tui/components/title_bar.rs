//! # TitleBar Component
//!
//! Top line of the screen: application name, status message, and the login
//! control on the right.
//!
//! The login control reads `[ Log in ]` until a display name is set, then
//! becomes a badge with the name. Whether clicking it does anything is decided
//! by the core (`App::login_bound`), not here.
//!
//! TitleBar is purely presentational: all fields are props.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

const LOGIN_LABEL: &str = "[ Log in ]";

pub struct TitleBar {
    pub display_name: Option<String>,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(display_name: Option<String>, status_message: String) -> Self {
        Self {
            display_name,
            status_message,
        }
    }

    fn control_text(&self) -> String {
        match &self.display_name {
            Some(name) => format!(" ● {name} "),
            None => LOGIN_LABEL.to_string(),
        }
    }

    /// Screen cells of the login control when the bar is drawn in `area`.
    pub fn control_rect(&self, area: Rect) -> Rect {
        let width = (self.control_text().width() as u16).min(area.width);
        Rect::new(area.x + area.width - width, area.y, width, 1)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let left = if self.status_message.is_empty() {
            "Chatline".to_string()
        } else {
            format!("Chatline | {}", self.status_message)
        };
        frame.render_widget(Span::raw(left), area);

        let control_style = match self.display_name {
            Some(_) => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            None => Style::default().fg(Color::Cyan),
        };
        let control = Line::from(Span::styled(self.control_text(), control_style));
        frame.render_widget(control, self.control_rect(area));
    }
}
