//! # Actions
//!
//! Everything that can happen in Chatline becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The service replies? That's `Action::ReplyReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing any I/O the adapter must perform.
//! No network or terminal access happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::chat::ChatOutcome;
use crate::core::state::{App, InFlight, LoginState};
use crate::core::transcript::Sender;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// First action of every run: restores the remembered name.
    Startup,
    /// The user submitted the input box contents.
    Submit(String),
    /// A dispatched request settled.
    ReplyReceived { generation: u64, outcome: ChatOutcome },
    /// Result of the background health probe.
    HealthChecked(ServiceHealth),
    /// Keyboard shortcut: always opens the login modal.
    OpenLogin,
    /// Click on the header login control. Only opens while the control is bound.
    HeaderClicked,
    CancelLogin,
    SaveLogin { name: String, remember: bool },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceHealth {
    Healthy,
    Degraded,
    Unreachable,
}

impl ServiceHealth {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceHealth::Healthy => "healthy",
            ServiceHealth::Degraded => "degraded",
            ServiceHealth::Unreachable => "unreachable",
        }
    }
}

/// Everything the adapter needs to issue one chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub generation: u64,
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    SpawnRequest(PendingRequest),
}

pub fn welcome_text(name: &str) -> String {
    format!("Hello, {name}! Good to see you. How can I help you today?")
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Startup => {
            if let Some(name) = app.identity.restore_saved_name() {
                info!("Restored remembered display name");
                app.login_bound = false;
                app.status_message = format!("Welcome back, {name}!");
            }
            Effect::None
        }
        Action::Submit(text) => submit(app, text),
        Action::ReplyReceived {
            generation,
            outcome,
        } => {
            receive_reply(app, generation, outcome);
            Effect::None
        }
        Action::HealthChecked(health) => {
            app.status_message = format!("Service: {}", health.label());
            Effect::None
        }
        Action::OpenLogin => {
            app.login = LoginState::Open { error: None };
            Effect::None
        }
        Action::HeaderClicked => {
            if app.login_bound {
                app.login = LoginState::Open { error: None };
            } else {
                debug!("Header clicked while login control is unbound");
            }
            Effect::None
        }
        Action::CancelLogin => {
            app.login = LoginState::Closed;
            Effect::None
        }
        Action::SaveLogin { name, remember } => {
            save_login(app, &name, remember);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: String) -> Effect {
    let message = text.trim();
    if message.is_empty() {
        return Effect::None;
    }
    if app.in_flight.is_some() {
        app.status_message = String::from("Still waiting for the last reply...");
        return Effect::None;
    }

    app.transcript.add_message(message, Sender::User);
    let typing = app.transcript.push_typing();

    let generation = app.next_generation;
    app.next_generation += 1;
    app.in_flight = Some(InFlight { generation, typing });
    app.status_message = String::from("Waiting for reply...");

    info!("Dispatching message (generation={}, len={})", generation, message.len());
    Effect::SpawnRequest(PendingRequest {
        generation,
        message: message.to_string(),
        session_id: app.identity.session_id(),
    })
}

fn receive_reply(app: &mut App, generation: u64, outcome: ChatOutcome) {
    let Some(in_flight) = app.in_flight else {
        warn!("Reply for generation {} arrived with nothing in flight", generation);
        return;
    };
    if in_flight.generation != generation {
        warn!(
            "Dropping stale reply (generation={}, expected={})",
            generation, in_flight.generation
        );
        return;
    }

    app.transcript.remove_typing(in_flight.typing);
    app.in_flight = None;

    app.status_message = match &outcome {
        ChatOutcome::Reply(_) => String::new(),
        ChatOutcome::ServerError => String::from("The service reported an error"),
        ChatOutcome::ConnectionError => String::from("Could not reach the service"),
    };
    app.transcript.add_message(outcome.bot_text(), Sender::Bot);
}

fn save_login(app: &mut App, name: &str, remember: bool) {
    if !app.login.is_open() {
        warn!("SaveLogin while the login modal is closed; ignoring");
        return;
    }
    match app.identity.save_name(name, remember) {
        Ok(name) => {
            info!("Display name set (remember={})", remember);
            app.login = LoginState::Closed;
            // The header control becomes a plain badge; Ctrl+L still renames
            app.login_bound = false;
            app.transcript.add_message(welcome_text(&name), Sender::Bot);
        }
        Err(e) => {
            app.login = LoginState::Open {
                error: Some(e.to_string()),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{APOLOGY_TEXT, CONNECTIVITY_TEXT};
    use crate::core::identity::SAVED_NAME_KEY;
    use crate::core::storage::KeyValueStore;
    use crate::core::transcript::EntryKind;
    use crate::test_support::{SharedStore, test_app, test_app_with_durable};

    fn expect_request(effect: Effect) -> PendingRequest {
        match effect {
            Effect::SpawnRequest(req) => req,
            other => panic!("expected SpawnRequest, got {other:?}"),
        }
    }

    #[test]
    fn submit_renders_user_entry_and_typing() {
        let mut app = test_app();
        let req = expect_request(update(&mut app, Action::Submit("  hello  ".into())));

        assert_eq!(req.message, "hello");
        assert_eq!(req.session_id, app.identity.session_id());
        let entries = app.transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sender(), Some(Sender::User));
        assert_eq!(entries[0].content(), "hello");
        assert!(entries[1].is_typing());
        assert!(app.is_awaiting_reply());
    }

    #[test]
    fn blank_submit_is_a_no_op() {
        for text in ["", "   ", "\n\t "] {
            let mut app = test_app();
            assert_eq!(update(&mut app, Action::Submit(text.into())), Effect::None);
            assert!(app.transcript.is_empty());
            assert!(!app.is_awaiting_reply());
        }
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut app = test_app();
        expect_request(update(&mut app, Action::Submit("one".into())));
        assert_eq!(update(&mut app, Action::Submit("two".into())), Effect::None);

        assert_eq!(app.transcript.messages().count(), 1);
        assert_eq!(app.transcript.typing_count(), 1);
    }

    #[test]
    fn reply_replaces_typing_with_bot_entry() {
        let mut app = test_app();
        let req = expect_request(update(&mut app, Action::Submit("oi".into())));
        update(
            &mut app,
            Action::ReplyReceived {
                generation: req.generation,
                outcome: ChatOutcome::Reply("Olá!".into()),
            },
        );

        let messages: Vec<_> = app.transcript.messages().collect();
        assert_eq!(messages, vec![(Sender::User, "oi"), (Sender::Bot, "Olá!")]);
        assert_eq!(app.transcript.typing_count(), 0);
        assert!(!app.is_awaiting_reply());
    }

    #[test]
    fn server_error_renders_apology() {
        let mut app = test_app();
        let req = expect_request(update(&mut app, Action::Submit("oi".into())));
        update(
            &mut app,
            Action::ReplyReceived {
                generation: req.generation,
                outcome: ChatOutcome::ServerError,
            },
        );
        let messages: Vec<_> = app.transcript.messages().collect();
        assert_eq!(messages, vec![(Sender::User, "oi"), (Sender::Bot, APOLOGY_TEXT)]);
    }

    #[test]
    fn connection_error_renders_connectivity_text() {
        let mut app = test_app();
        let req = expect_request(update(&mut app, Action::Submit("oi".into())));
        update(
            &mut app,
            Action::ReplyReceived {
                generation: req.generation,
                outcome: ChatOutcome::ConnectionError,
            },
        );
        let messages: Vec<_> = app.transcript.messages().collect();
        assert_eq!(
            messages,
            vec![(Sender::User, "oi"), (Sender::Bot, CONNECTIVITY_TEXT)]
        );
    }

    #[test]
    fn stale_or_duplicate_reply_is_dropped() {
        let mut app = test_app();
        let req = expect_request(update(&mut app, Action::Submit("oi".into())));
        update(
            &mut app,
            Action::ReplyReceived {
                generation: req.generation + 7,
                outcome: ChatOutcome::Reply("wrong".into()),
            },
        );
        assert!(app.is_awaiting_reply());
        assert_eq!(app.transcript.typing_count(), 1);

        let settle = Action::ReplyReceived {
            generation: req.generation,
            outcome: ChatOutcome::Reply("right".into()),
        };
        update(&mut app, settle.clone());
        update(&mut app, settle);
        let bot_count = app
            .transcript
            .messages()
            .filter(|(sender, _)| *sender == Sender::Bot)
            .count();
        assert_eq!(bot_count, 1);
    }

    #[test]
    fn generations_increase_per_request() {
        let mut app = test_app();
        let first = expect_request(update(&mut app, Action::Submit("a".into())));
        update(
            &mut app,
            Action::ReplyReceived {
                generation: first.generation,
                outcome: ChatOutcome::Reply("x".into()),
            },
        );
        let second = expect_request(update(&mut app, Action::Submit("b".into())));
        assert!(second.generation > first.generation);
        assert_eq!(first.session_id, second.session_id);
    }

    #[test]
    fn save_login_with_remember() {
        let durable = SharedStore::default();
        let mut app = test_app_with_durable(durable.clone());
        update(&mut app, Action::OpenLogin);
        update(
            &mut app,
            Action::SaveLogin {
                name: "Ana".into(),
                remember: true,
            },
        );

        assert_eq!(durable.get(SAVED_NAME_KEY).as_deref(), Some("Ana"));
        assert_eq!(app.display_name(), Some("Ana"));
        assert_eq!(app.login, LoginState::Closed);
        let last = app.transcript.entries().last().unwrap();
        assert_eq!(last.sender(), Some(Sender::Bot));
        assert!(last.content().contains("Ana"));
    }

    #[test]
    fn save_login_with_empty_name_stays_open() {
        let durable = SharedStore::default();
        let mut app = test_app_with_durable(durable.clone());
        update(&mut app, Action::OpenLogin);
        update(
            &mut app,
            Action::SaveLogin {
                name: "".into(),
                remember: true,
            },
        );

        assert_eq!(durable.get(SAVED_NAME_KEY), None);
        assert!(matches!(app.login, LoginState::Open { error: Some(_) }));
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn save_login_without_remember_clears_durable_name() {
        let durable = SharedStore::default();
        let mut app = test_app_with_durable(durable.clone());
        for (name, remember) in [("Ana", true), ("Ana", false)] {
            update(&mut app, Action::OpenLogin);
            update(
                &mut app,
                Action::SaveLogin {
                    name: name.into(),
                    remember,
                },
            );
        }
        assert_eq!(durable.get(SAVED_NAME_KEY), None);
        assert_eq!(app.display_name(), Some("Ana"));
    }

    #[test]
    fn cancel_login_closes_without_side_effects() {
        let mut app = test_app();
        update(&mut app, Action::OpenLogin);
        update(&mut app, Action::CancelLogin);
        assert_eq!(app.login, LoginState::Closed);
        assert!(app.transcript.is_empty());
        assert_eq!(app.display_name(), None);
    }

    #[test]
    fn header_click_respects_binding() {
        let mut app = test_app();
        app.login_bound = false;
        update(&mut app, Action::HeaderClicked);
        assert!(!app.login.is_open());

        app.login_bound = true;
        update(&mut app, Action::HeaderClicked);
        assert!(app.login.is_open());
    }

    #[test]
    fn successful_login_unbinds_header_control() {
        let mut app = test_app();
        update(&mut app, Action::HeaderClicked);
        update(
            &mut app,
            Action::SaveLogin {
                name: "Ana".into(),
                remember: false,
            },
        );
        assert!(!app.login_bound);

        update(&mut app, Action::HeaderClicked);
        assert!(!app.login.is_open());
        update(&mut app, Action::OpenLogin);
        assert!(app.login.is_open());
    }

    #[test]
    fn failed_login_keeps_header_control_bound() {
        let mut app = test_app();
        update(&mut app, Action::HeaderClicked);
        update(
            &mut app,
            Action::SaveLogin {
                name: "  ".into(),
                remember: false,
            },
        );
        assert!(app.login_bound);
    }

    #[test]
    fn startup_restores_saved_name_without_opening_login() {
        let mut durable = SharedStore::default();
        durable.set(SAVED_NAME_KEY, "Caio").unwrap();
        let mut app = test_app_with_durable(durable);

        update(&mut app, Action::Startup);
        assert_eq!(app.display_name(), Some("Caio"));
        assert!(!app.login.is_open());
        assert!(!app.login_bound);
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn login_does_not_disturb_pending_request() {
        let mut app = test_app();
        let req = expect_request(update(&mut app, Action::Submit("oi".into())));
        update(&mut app, Action::OpenLogin);
        update(
            &mut app,
            Action::SaveLogin {
                name: "Ana".into(),
                remember: false,
            },
        );
        update(
            &mut app,
            Action::ReplyReceived {
                generation: req.generation,
                outcome: ChatOutcome::Reply("done".into()),
            },
        );
        let kinds: Vec<_> = app
            .transcript
            .entries()
            .iter()
            .map(|e| matches!(e.kind, EntryKind::Typing))
            .collect();
        assert_eq!(kinds, vec![false, false, false]);
        assert_eq!(app.transcript.entries().last().unwrap().content(), "done");
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
