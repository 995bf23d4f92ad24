//! # TUI Components
//!
//! Reusable UI pieces following the React-style pattern in
//! [`component`](crate::tui::component): props in struct fields, persistent
//! state in a separate struct owned by `TuiState`.
//!
//! ```text
//! ┌ Chatline | status ──────────── [ Log in ] ┐  ← TitleBar
//! │ ╭ you · 14:02 ───────────────────────╮    │
//! │ │ hello                              │    │  ← MessageList of Message
//! │ ╰────────────────────────────────────╯    │
//! │ ╭ ◆ assistant · 14:02 ───────────────╮    │
//! │ │ Hi! How can I help?                │    │
//! │ ╰────────────────────────────────────╯    │
//! │ ╭ Message ─────────────────── [ Send ] ╮  │  ← InputBox
//! │ ╰──────────────────────────────────────╯  │
//! └───────────────────────────────────────────┘
//! ```
//!
//! `LoginModal` is drawn on top of everything while the login flow is open.

pub mod input_box;
pub mod login_modal;
pub mod message;
pub mod message_list;
pub mod title_bar;

pub use input_box::InputBox;
pub use login_modal::{LoginEvent, LoginModal};
pub use message::{Avatar, Message, RenderContext};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
