pub mod client;
pub mod types;

pub use client::{ChatError, ChatService, HttpChatService};
pub use types::{
    APOLOGY_TEXT, CONNECTIVITY_TEXT, ChatOutcome, ChatReply, ChatRequest, HealthStatus,
};
