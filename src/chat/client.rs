//! Chat service client.
//!
//! The remote service is a black box with two routes:
//!
//! - `POST /api/chat` with `{message, user_id}` → `{response, ...}`
//! - `GET /api/health` → `{status, database}`
//!
//! [`ChatService`] is the seam the TUI talks to; [`HttpChatService`] is the real
//! implementation and tests substitute a scripted one.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::types::{ChatReply, ChatRequest, HealthStatus};

/// Errors that can occur while talking to the chat service.
#[derive(Debug)]
pub enum ChatError {
    /// Client misconfigured (bad base URL, TLS backend unavailable).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The service answered with a non-success status.
    Api { status: u16, message: String },
    /// A success status whose body could not be read as the expected JSON.
    Parse(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Config(msg) => write!(f, "config error: {msg}"),
            ChatError::Network(msg) => write!(f, "network error: {msg}"),
            ChatError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ChatError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ChatError {}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Sends one message and waits for the single reply.
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError>;

    /// Asks the service whether it is up.
    async fn health(&self) -> Result<HealthStatus, ChatError>;
}

pub struct HttpChatService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatService {
    /// Builds a client whose every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Config(e.to_string()))?;
        info!(
            "Chat service at {} (timeout {}s)",
            base_url,
            timeout.as_secs()
        );
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

/// Reads a non-success response into `ChatError::Api`, keeping whatever text the body had.
async fn api_error(response: reqwest::Response) -> ChatError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
    ChatError::Api { status, message }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        debug!(
            "POST /api/chat (message len={}, user_id={})",
            request.message.len(),
            request.user_id
        );

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            warn!("Chat request failed: {}", err);
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|e| ChatError::Parse(e.to_string()))?;

        debug!(
            "Reply received (len={}, intent={:?}, confidence={:?})",
            reply.response.len(),
            reply.intent,
            reply.confidence
        );
        Ok(reply)
    }

    async fn health(&self) -> Result<HealthStatus, ChatError> {
        let response = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))
    }
}
