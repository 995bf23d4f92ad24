use serde::{Deserialize, Serialize};

use super::client::ChatError;

/// Body of `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    /// The session identifier. The backend calls it `user_id`.
    pub user_id: String,
}

/// Successful reply from `POST /api/chat`.
///
/// Only `response` is required; the backend also reports how it produced the
/// answer, which we log but never render.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Body of `GET /api/health`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

pub const APOLOGY_TEXT: &str = "Sorry, something went wrong. Please try again.";
pub const CONNECTIVITY_TEXT: &str =
    "Connection error. Please check your internet connection and try again.";

/// The three terminal results of one dispatched message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Reply(String),
    /// The service answered with a non-success status.
    ServerError,
    /// The request never completed: network failure, timeout, or an unreadable body.
    ConnectionError,
}

impl ChatOutcome {
    pub fn from_result(result: Result<ChatReply, ChatError>) -> Self {
        match result {
            Ok(reply) => ChatOutcome::Reply(reply.response),
            Err(ChatError::Api { .. }) => ChatOutcome::ServerError,
            Err(ChatError::Network(_) | ChatError::Parse(_) | ChatError::Config(_)) => {
                ChatOutcome::ConnectionError
            }
        }
    }

    /// Text of the bot entry this outcome produces.
    pub fn bot_text(&self) -> &str {
        match self {
            ChatOutcome::Reply(text) => text,
            ChatOutcome::ServerError => APOLOGY_TEXT,
            ChatOutcome::ConnectionError => CONNECTIVITY_TEXT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_user_id() {
        let req = ChatRequest {
            message: "oi".to_string(),
            user_id: "user_abc".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"message": "oi", "user_id": "user_abc"}));
    }

    #[test]
    fn reply_tolerates_missing_optional_fields() {
        let reply: ChatReply = serde_json::from_str(r#"{"response": "Olá"}"#).unwrap();
        assert_eq!(reply.response, "Olá");
        assert_eq!(reply.intent, None);
        assert_eq!(reply.confidence, None);
    }

    #[test]
    fn reply_reads_intent_and_confidence() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"response": "ok", "intent": "ai_generated", "confidence": 0.7}"#,
        )
        .unwrap();
        assert_eq!(reply.intent.as_deref(), Some("ai_generated"));
        assert_eq!(reply.confidence, Some(0.7));
    }

    #[test]
    fn reply_without_response_is_rejected() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"error": "boom"}"#).is_err());
    }

    #[test]
    fn outcome_mapping() {
        let api = ChatError::Api {
            status: 500,
            message: "Internal".into(),
        };
        assert_eq!(ChatOutcome::from_result(Err(api)), ChatOutcome::ServerError);
        assert_eq!(
            ChatOutcome::from_result(Err(ChatError::Network("refused".into()))),
            ChatOutcome::ConnectionError
        );
        assert_eq!(
            ChatOutcome::from_result(Err(ChatError::Parse("eof".into()))),
            ChatOutcome::ConnectionError
        );
        assert_eq!(ChatOutcome::ServerError.bot_text(), APOLOGY_TEXT);
        assert_eq!(ChatOutcome::ConnectionError.bot_text(), CONNECTIVITY_TEXT);
        assert_eq!(ChatOutcome::Reply("hey".into()).bot_text(), "hey");
    }
}
