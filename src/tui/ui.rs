use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::input_box::INPUT_HEIGHT;
use crate::tui::components::{InputBox, MessageList, RenderContext, TitleBar};

/// Something clickable on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    LoginControl,
    SendButton,
}

/// Splits the frame into title bar, message list, and input box.
pub fn screen_areas(frame_area: Rect) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT)]).areas(frame_area)
}

fn title_bar(app: &App) -> TitleBar {
    TitleBar::new(
        app.display_name().map(str::to_string),
        app.status_message.clone(),
    )
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let [title_area, main_area, input_area] = screen_areas(frame.area());

    title_bar(app).render(frame, title_area);

    let ctx = RenderContext {
        formatter: tui.formatter,
        avatar: &tui.avatar,
        user_name: app.display_name(),
        spinner_frame: tui.spinner_frame,
    };
    MessageList::new(&mut tui.message_list, &app.transcript, ctx).render(frame, main_area);

    tui.input_box.busy = app.is_awaiting_reply();
    tui.input_box.render(frame, input_area);

    if app.login.is_open() {
        tui.login_modal.render(frame, frame.area());
    }
}

/// Maps a click at (`column`, `row`) to the control under it, if any.
pub fn hit_test(column: u16, row: u16, frame_area: Rect, app: &App) -> Option<ClickTarget> {
    let [title_area, _main_area, input_area] = screen_areas(frame_area);
    let position = Position::new(column, row);

    if title_bar(app).control_rect(title_area).contains(position) {
        return Some(ClickTarget::LoginControl);
    }
    if InputBox::send_button_rect(input_area).contains(position) {
        return Some(ClickTarget::SendButton);
    }
    None
}
