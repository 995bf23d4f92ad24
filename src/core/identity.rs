//! # Identity Store
//!
//! Who is chatting: a per-session identifier sent with every request, and an
//! optional display name chosen in the login modal.
//!
//! ```text
//! IdentityStore
//! ├── ephemeral: MemoryStore   // "userSessionId", gone when the process exits
//! ├── durable:   FileStore     // "savedUserName", survives restarts
//! └── current_name             // what the header shows right now
//! ```
//!
//! The two values are independent: clearing the remembered name never touches the
//! session id, and a fresh session id never forgets the name.

use std::fmt;

use log::{debug, info, warn};

use crate::core::storage::KeyValueStore;

/// Ephemeral storage key for the session identifier.
pub const SESSION_ID_KEY: &str = "userSessionId";
/// Durable storage key for the remembered display name.
pub const SAVED_NAME_KEY: &str = "savedUserName";

const SESSION_ID_PREFIX: &str = "user_";
const SESSION_ID_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The name was empty after trimming whitespace.
    EmptyName,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::EmptyName => write!(f, "Please enter your name."),
        }
    }
}

impl std::error::Error for IdentityError {}

pub struct IdentityStore {
    ephemeral: Box<dyn KeyValueStore>,
    durable: Box<dyn KeyValueStore>,
    current_name: Option<String>,
}

impl IdentityStore {
    pub fn new(ephemeral: Box<dyn KeyValueStore>, durable: Box<dyn KeyValueStore>) -> Self {
        Self {
            ephemeral,
            durable,
            current_name: None,
        }
    }

    /// Returns the session id, creating and storing one on first use.
    pub fn session_id(&mut self) -> String {
        if let Some(id) = self.ephemeral.get(SESSION_ID_KEY).filter(|id| !id.is_empty()) {
            return id;
        }

        let id = new_session_id();
        if let Err(e) = self.ephemeral.set(SESSION_ID_KEY, &id) {
            // Still usable for this call; the next call will just mint another
            warn!("Failed to store session id: {}", e);
        }
        info!("Generated session id {}", id);
        id
    }

    /// Reads the remembered name from durable storage, if any.
    pub fn load_saved_name(&self) -> Option<String> {
        self.durable
            .get(SAVED_NAME_KEY)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Loads the remembered name into memory. Returns it for the caller's convenience.
    pub fn restore_saved_name(&mut self) -> Option<String> {
        let saved = self.load_saved_name();
        if let Some(ref name) = saved {
            debug!("Restored saved name ({} chars)", name.len());
            self.current_name = Some(name.clone());
        }
        saved
    }

    /// Validates and applies a new display name.
    ///
    /// `remember = true` overwrites the durable copy, `false` deletes it. The
    /// in-memory name is updated either way. Storage failures are logged and do
    /// not fail the login.
    pub fn save_name(&mut self, name: &str, remember: bool) -> Result<String, IdentityError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }

        self.current_name = Some(name.to_string());

        let result = if remember {
            self.durable.set(SAVED_NAME_KEY, name)
        } else {
            self.durable.remove(SAVED_NAME_KEY)
        };
        if let Err(e) = result {
            warn!("Failed to update remembered name (remember={}): {}", remember, e);
        }

        Ok(name.to_string())
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }
}

/// `user_` followed by nine lowercase alphanumerics.
fn new_session_id() -> String {
    let token: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SESSION_ID_LEN)
        .collect();
    format!("{SESSION_ID_PREFIX}{token}")
}
