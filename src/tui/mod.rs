//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard/mouse events into core `Action`s, and executes the
//! `Effect`s the reducer returns.
//!
//! ## Threading
//!
//! Everything runs on the event-loop thread except chat requests and the
//! startup health probe, which run as tokio tasks and report back as `Action`s
//! through an mpsc channel drained once per loop iteration.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (reply pending): draws every ~120ms so the typing indicator moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or background results.

mod component;
pub mod components;
mod event;
pub mod formatter;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::{self, stdout};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Rect;

use crate::chat::{ChatError, ChatOutcome, ChatRequest, ChatService, HttpChatService};
use crate::core::action::{Action, Effect, PendingRequest, ServiceHealth, update};
use crate::core::config::ResolvedConfig;
use crate::core::identity::IdentityStore;
use crate::core::state::{App, LoginState};
use crate::core::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::tui::component::EventHandler;
use crate::tui::components::{Avatar, InputBox, LoginEvent, LoginModal, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::formatter::Formatter;
use crate::tui::ui::ClickTarget;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub login_modal: LoginModal,
    pub formatter: Formatter,
    pub avatar: Avatar,
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(formatter: Formatter, avatar: Avatar) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            login_modal: LoginModal::new(),
            formatter,
            avatar,
            spinner_frame: 0,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            Formatter::from_config(config.markdown),
            Avatar {
                glyph: config.avatar.clone(),
                name: config.assistant_name.clone(),
            },
        )
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // Kitty keyboard protocol reports press/release separately; event.rs keeps presses only
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

/// Ephemeral store in memory, durable store on disk (in memory if there is no home dir).
pub fn build_identity(config: &ResolvedConfig) -> IdentityStore {
    let durable: Box<dyn KeyValueStore> = match &config.storage_path {
        Some(path) => {
            debug!("Durable storage at {}", path.display());
            Box::new(FileStore::new(path))
        }
        None => {
            warn!("No home directory; remembered names will not survive restarts");
            Box::new(MemoryStore::new())
        }
    };
    IdentityStore::new(Box::new(MemoryStore::new()), durable)
}

pub fn run(config: ResolvedConfig) -> io::Result<()> {
    let service: Arc<dyn ChatService> = Arc::new(
        HttpChatService::new(config.base_url.clone(), config.request_timeout)
            .map_err(|e| io::Error::other(e.to_string()))?,
    );
    let mut app = App::new(build_identity(&config));
    update(&mut app, Action::Startup);
    let mut tui = TuiState::from_config(&config);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e))
        .ok();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    spawn_health_check(service.clone(), tx.clone());

    let mut active_request: Option<tokio::task::AbortHandle> = None;
    let start_time = Instant::now();
    let mut needs_redraw = true;

    'event_loop: loop {
        let animating = app.is_awaiting_reply();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            tui.spinner_frame = (start_time.elapsed().as_millis() / 400) as usize;
            tui.message_list
                .follow_new_entries(app.transcript.entries().last().map(|e| e.id));
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(120)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain everything pending before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let frame_area = terminal.get_frame().area();
            match dispatch_event(&mut app, &mut tui, event, frame_area) {
                Effect::Quit => break 'event_loop,
                Effect::SpawnRequest(request) => {
                    active_request = Some(
                        spawn_request(service.clone(), request, config.request_timeout, tx.clone())
                            .abort_handle(),
                    );
                }
                Effect::None => {}
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if update(&mut app, action) == Effect::Quit {
                break 'event_loop;
            }
        }
        if !app.is_awaiting_reply() {
            active_request = None;
        }
    }

    if let Some(handle) = active_request {
        handle.abort();
    }
    ratatui::restore();
    info!("Chatline shut down");
    Ok(())
}

/// Routes one terminal event to the modal, the input bindings, or the message list.
fn dispatch_event(app: &mut App, tui: &mut TuiState, event: TuiEvent, frame_area: Rect) -> Effect {
    match event {
        TuiEvent::Resize => return Effect::None,
        TuiEvent::ForceQuit => return update(app, Action::Quit),
        _ => {}
    }

    // The open modal captures all other input
    if app.login.is_open() {
        let Some(login_event) = tui.login_modal.handle_event(&event) else {
            return Effect::None;
        };
        let effect = match login_event {
            LoginEvent::Save { name, remember } => update(app, Action::SaveLogin { name, remember }),
            LoginEvent::Cancel => update(app, Action::CancelLogin),
        };
        tui.login_modal.error = match &app.login {
            LoginState::Open { error } => error.clone(),
            LoginState::Closed => None,
        };
        return effect;
    }

    match event {
        TuiEvent::OpenLogin => open_login(app, tui, Action::OpenLogin),
        TuiEvent::MouseClick(column, row) => match ui::hit_test(column, row, frame_area, app) {
            Some(ClickTarget::LoginControl) => open_login(app, tui, Action::HeaderClicked),
            Some(ClickTarget::SendButton) => submit_input(app, tui),
            None => Effect::None,
        },
        TuiEvent::Submit => submit_input(app, tui),
        TuiEvent::Escape => update(app, Action::Quit),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            Effect::None
        }
        other => {
            tui.input_box.handle_event(&other);
            Effect::None
        }
    }
}

fn open_login(app: &mut App, tui: &mut TuiState, action: Action) -> Effect {
    let effect = update(app, action);
    if app.login.is_open() {
        let remembered = app.identity.load_saved_name().is_some();
        tui.login_modal.open(app.display_name(), remembered);
    }
    effect
}

/// The send trigger. The input text is only consumed when a request can go out.
fn submit_input(app: &mut App, tui: &mut TuiState) -> Effect {
    if app.is_awaiting_reply() {
        // Reducer refuses and updates the status; the typed text stays
        return update(app, Action::Submit(tui.input_box.buffer.clone()));
    }
    match tui.input_box.take_submission() {
        Some(text) => update(app, Action::Submit(text)),
        None => Effect::None,
    }
}

/// Issues one chat request and reports the outcome as `Action::ReplyReceived`.
///
/// `timeout` bounds the whole exchange regardless of the service implementation;
/// hitting it is a connection failure.
pub fn spawn_request(
    service: Arc<dyn ChatService>,
    request: PendingRequest,
    timeout: Duration,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!("Spawning chat request (generation={})", request.generation);
    let PendingRequest {
        generation,
        message,
        session_id,
    } = request;

    tokio::spawn(async move {
        let started = Instant::now();
        let chat_request = ChatRequest {
            message,
            user_id: session_id,
        };
        let outcome = match tokio::time::timeout(timeout, service.send(chat_request)).await {
            Ok(result) => {
                if let Err(ref e) = result {
                    info!("Chat request failed: {}", e);
                }
                ChatOutcome::from_result(result)
            }
            Err(_) => {
                warn!(
                    "Chat request timed out after {}s (generation={})",
                    timeout.as_secs(),
                    generation
                );
                ChatOutcome::ConnectionError
            }
        };
        debug!(
            "Request settled in {}ms (generation={})",
            started.elapsed().as_millis(),
            generation
        );
        if tx.send(Action::ReplyReceived { generation, outcome }).is_err() {
            warn!("Failed to deliver reply for generation {}: receiver dropped", generation);
        }
    })
}

fn spawn_health_check(service: Arc<dyn ChatService>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let health = match service.health().await {
            Ok(status) if status.is_healthy() => ServiceHealth::Healthy,
            Ok(status) => {
                info!("Service reports {:?} (database={:?})", status.status, status.database);
                ServiceHealth::Degraded
            }
            Err(ChatError::Api { status, .. }) => {
                info!("Health check returned HTTP {}", status);
                ServiceHealth::Degraded
            }
            Err(e) => {
                info!("Health check failed: {}", e);
                ServiceHealth::Unreachable
            }
        };
        if tx.send(Action::HealthChecked(health)).is_err() {
            warn!("Failed to deliver health check: receiver dropped");
        }
    });
}
