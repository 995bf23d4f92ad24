//! How entry content becomes styled text.
//!
//! User entries are always literal. Bot entries go through the [`Formatter`]
//! picked once at startup from config.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use log::warn;
use ratatui::style::{Color, Style};
use ratatui::text::Text;

use crate::tui::markdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    Markdown,
    Plain,
}

impl Formatter {
    pub fn from_config(markdown: bool) -> Self {
        if markdown {
            Formatter::Markdown
        } else {
            Formatter::Plain
        }
    }

    /// Formats bot content. A panicking markdown pass degrades to literal text.
    pub fn format(&self, content: &str, fg: Color) -> Text<'static> {
        match self {
            Formatter::Plain => literal(content, fg),
            Formatter::Markdown => render_or_literal(content, fg, markdown::render),
        }
    }
}

/// Runs `render`, falling back to [`literal`] if it panics.
///
/// The process panic hook is swapped for a silent one for the duration of the
/// call: the hook installed by `ratatui::init` would otherwise restore the
/// terminal and print the panic before `catch_unwind` gets control.
fn render_or_literal(
    content: &str,
    fg: Color,
    render: fn(&str, Color) -> Text<'static>,
) -> Text<'static> {
    static HOOK_SWAP: Mutex<()> = Mutex::new(());
    let _swap = HOOK_SWAP.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(|| render(content, fg)));
    panic::set_hook(previous_hook);

    match result {
        Ok(text) => text,
        Err(_) => {
            warn!("Markdown rendering panicked; showing reply as plain text");
            literal(content, fg)
        }
    }
}

/// Content exactly as typed, one `Line` per source line. Never interpreted.
pub fn literal(content: &str, fg: Color) -> Text<'static> {
    Text::styled(content.to_string(), Style::default().fg(fg))
}
