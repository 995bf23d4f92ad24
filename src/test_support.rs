//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::chat::{ChatError, ChatReply, ChatRequest, ChatService, HealthStatus};
use crate::core::identity::IdentityStore;
use crate::core::state::App;
use crate::core::storage::{KeyValueStore, MemoryStore, StorageError};

/// In-memory store whose clones share contents, so tests can inspect what the
/// app wrote after handing it a copy.
#[derive(Clone, Default)]
pub struct SharedStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Creates a test App backed by memory stores.
pub fn test_app() -> App {
    test_app_with_durable(SharedStore::default())
}

pub fn test_app_with_durable(durable: SharedStore) -> App {
    App::new(IdentityStore::new(
        Box::new(MemoryStore::new()),
        Box::new(durable),
    ))
}

/// A chat service that answers every request with a fixed result and records
/// what it was sent.
pub struct ScriptedService {
    pub reply: fn() -> Result<ChatReply, ChatError>,
    pub received: Mutex<Vec<ChatRequest>>,
}

impl ScriptedService {
    pub fn new(reply: fn() -> Result<ChatReply, ChatError>) -> Self {
        Self {
            reply,
            received: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatService for ScriptedService {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        self.received.lock().unwrap().push(request);
        (self.reply)()
    }

    async fn health(&self) -> Result<HealthStatus, ChatError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            database: Some("connected".to_string()),
        })
    }
}
