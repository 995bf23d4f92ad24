use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen that knows how to draw itself.
///
/// Props live in struct fields; persistent presentation state (scroll offsets,
/// edit buffers) lives in a separate state struct owned by `TuiState`.
/// `render` takes `&mut self` so a component can refresh caches while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events.
pub trait EventHandler {
    /// The higher-level event this component reports to its parent.
    type Event;

    /// Handle a `TuiEvent`, optionally producing a component event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
