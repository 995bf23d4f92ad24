//! # Application State
//!
//! Core business state for Chatline. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── identity: IdentityStore       // session id + display name
//! ├── transcript: Transcript        // rendered conversation
//! ├── login: LoginState             // modal open/closed
//! ├── login_bound: bool             // header control opens the modal
//! ├── in_flight: Option<InFlight>   // the one outstanding request
//! ├── next_generation: u64          // request generation counter
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::identity::IdentityStore;
use crate::core::transcript::{Transcript, TypingId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginState {
    #[default]
    Closed,
    /// `error` is the inline validation message from the last save attempt.
    Open { error: Option<String> },
}

impl LoginState {
    pub fn is_open(&self) -> bool {
        matches!(self, LoginState::Open { .. })
    }
}

/// The request currently awaiting a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    pub generation: u64,
    pub typing: TypingId,
}

pub struct App {
    pub identity: IdentityStore,
    pub transcript: Transcript,
    pub login: LoginState,
    pub login_bound: bool,
    pub in_flight: Option<InFlight>,
    pub next_generation: u64,
    pub status_message: String,
}

impl App {
    pub fn new(identity: IdentityStore) -> Self {
        Self {
            identity,
            transcript: Transcript::new(),
            login: LoginState::Closed,
            login_bound: true,
            in_flight: None,
            next_generation: 1,
            status_message: String::from("Welcome to Chatline!"),
        }
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.identity.current_name()
    }
}
