//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//! Heights of settled entries are cached by entry id and thrown away when the
//! width changes; the typing indicator is measured every frame.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, RenderContext};
use crate::tui::event::TuiEvent;

const EMPTY_HINT: &str = "Say hello to start the conversation.\nCtrl+L to log in · Esc to quit";

/// Scroll and layout state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    heights: HashMap<u64, u16>,
    cached_width: u16,
    total_height: u16,
    last_entry_id: Option<u64>,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            heights: HashMap::new(),
            cached_width: 0,
            total_height: 0,
            last_entry_id: None,
        }
    }

    /// Re-pins to the bottom when the newest entry changed since the last call.
    ///
    /// Compares ids rather than counts: a reply replaces the typing indicator,
    /// leaving the length unchanged.
    pub fn follow_new_entries(&mut self, last_entry_id: Option<u64>) {
        if last_entry_id.is_some() && last_entry_id != self.last_entry_id {
            self.stick_to_bottom = true;
        }
        self.last_entry_id = last_entry_id;
    }

    fn max_offset(&self) -> u16 {
        self.total_height.saturating_sub(self.viewport_height)
    }

    fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the end.
    fn repin_if_at_bottom(&mut self) {
        if self.scroll_state.offset().y >= self.max_offset() {
            self.stick_to_bottom = true;
            self.clamp_scroll();
        }
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub ctx: RenderContext<'a>,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        ctx: RenderContext<'a>,
    ) -> Self {
        Self {
            state,
            transcript,
            ctx,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.transcript.is_empty() {
            let hint = Paragraph::new(EMPTY_HINT)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            let top = area.y + area.height / 2;
            frame.render_widget(hint, Rect::new(area.x, top.saturating_sub(1), area.width, 2.min(area.height)));
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        if content_width != self.state.cached_width {
            self.state.heights.clear();
            self.state.cached_width = content_width;
        }

        // 1. Build widgets and measure
        let mut laid_out = Vec::with_capacity(self.transcript.len());
        for entry in self.transcript.entries() {
            let message = Message::new(entry, &self.ctx);
            let height = if entry.is_typing() {
                message.height(content_width)
            } else {
                *self
                    .state
                    .heights
                    .entry(entry.id)
                    .or_insert_with(|| message.height(content_width))
            };
            laid_out.push((message, height));
        }

        // ScrollView content is at most u16::MAX rows; keep the newest entries that fit
        let mut budget = u16::MAX;
        let mut first_shown = laid_out.len();
        for (i, (_, height)) in laid_out.iter().enumerate().rev() {
            let Some(rest) = budget.checked_sub(*height) else {
                break;
            };
            budget = rest;
            first_shown = i;
        }
        let laid_out = laid_out.split_off(first_shown);
        let total_height = u16::MAX - budget;
        self.state.total_height = total_height;
        self.state.viewport_height = area.height;

        // 2. Clamp unless following the tail
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        // 3. Render into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (message, height) in laid_out {
            scroll_view.render_widget(message, Rect::new(0, y_offset, content_width, height));
            y_offset = y_offset.saturating_add(height);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
