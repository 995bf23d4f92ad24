use std::sync::{Arc, mpsc};
use std::time::Duration;

use chatline::chat::{
    APOLOGY_TEXT, CONNECTIVITY_TEXT, ChatError, ChatOutcome, ChatRequest, ChatService,
    HttpChatService,
};
use chatline::core::action::{Action, Effect, update};
use chatline::core::identity::IdentityStore;
use chatline::core::state::App;
use chatline::core::storage::MemoryStore;
use chatline::core::transcript::Sender;
use chatline::tui::spawn_request;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn service_for(server: &MockServer) -> HttpChatService {
    HttpChatService::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        user_id: "user_abc123xyz".to_string(),
    }
}

fn memory_app() -> App {
    App::new(IdentityStore::new(
        Box::new(MemoryStore::new()),
        Box::new(MemoryStore::new()),
    ))
}

/// Submits `text` through the reducer, runs the resulting request against
/// `service`, and applies the reply.
async fn exchange(app: &mut App, service: Arc<dyn ChatService>, text: &str) {
    let pending = match update(app, Action::Submit(text.to_string())) {
        Effect::SpawnRequest(pending) => pending,
        other => panic!("expected a request, got {other:?}"),
    };
    let (tx, rx) = mpsc::channel();
    spawn_request(service, pending, Duration::from_secs(5), tx)
        .await
        .unwrap();
    update(app, rx.recv().unwrap());
}

// ============================================================================
// Chat Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_chat_success_sends_message_and_user_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "oi", "user_id": "user_abc123xyz"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Olá! Como posso ajudar?",
            "intent": "greeting",
            "confidence": 0.92
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = assert_ok!(service_for(&mock_server).send(request("oi")).await);
    assert_eq!(reply.response, "Olá! Como posso ajudar?");
    assert_eq!(reply.intent.as_deref(), Some("greeting"));
}

#[tokio::test]
async fn test_chat_reply_with_only_response_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .mount(&mock_server)
        .await;

    let reply = assert_ok!(service_for(&mock_server).send(request("ping")).await);
    assert_eq!(reply.response, "ok");
    assert_eq!(reply.intent, None);
    assert_eq!(reply.confidence, None);
}

#[tokio::test]
async fn test_chat_server_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(service_for(&mock_server).send(request("oi")).await);
    match &err {
        ChatError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert!(message.contains("Internal Server Error"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
    assert_eq!(ChatOutcome::from_result(Err(err)), ChatOutcome::ServerError);
}

#[tokio::test]
async fn test_chat_malformed_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let err = assert_err!(service_for(&mock_server).send(request("oi")).await);
    assert!(matches!(err, ChatError::Parse(_)), "got {err:?}");
    assert_eq!(
        ChatOutcome::from_result(Err(err)),
        ChatOutcome::ConnectionError
    );
}

#[tokio::test]
async fn test_chat_unreachable_service() {
    // Nothing listens on the discard port
    let service = HttpChatService::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = assert_err!(service.send(request("oi")).await);
    assert!(matches!(err, ChatError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_chat_client_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let service = HttpChatService::new(mock_server.uri(), Duration::from_millis(200)).unwrap();
    let err = assert_err!(service.send(request("oi")).await);
    assert!(matches!(err, ChatError::Network(_)), "got {err:?}");
}

// ============================================================================
// Health Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_health_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "database": "connected"})),
        )
        .mount(&mock_server)
        .await;

    let health = assert_ok!(service_for(&mock_server).health().await);
    assert!(health.is_healthy());
    assert_eq!(health.database.as_deref(), Some("connected"));
}

#[tokio::test]
async fn test_health_unhealthy_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({"status": "unhealthy", "error": "db down"})),
        )
        .mount(&mock_server)
        .await;

    let err = assert_err!(service_for(&mock_server).health().await);
    assert!(matches!(err, ChatError::Api { status: 503, .. }));
}

// ============================================================================
// End-to-End Through the Reducer
// ============================================================================

#[tokio::test]
async fn test_round_trip_updates_transcript() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Olá!"})))
        .mount(&mock_server)
        .await;

    let mut app = memory_app();
    exchange(&mut app, Arc::new(service_for(&mock_server)), "  oi  ").await;

    let messages: Vec<_> = app.transcript.messages().collect();
    assert_eq!(messages, vec![(Sender::User, "oi"), (Sender::Bot, "Olá!")]);
    assert_eq!(app.transcript.typing_count(), 0);
    assert!(!app.is_awaiting_reply());
}

#[tokio::test]
async fn test_session_id_is_stable_across_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut app = memory_app();
    let service: Arc<dyn ChatService> = Arc::new(service_for(&mock_server));
    exchange(&mut app, service.clone(), "first").await;
    exchange(&mut app, service, "second").await;

    let requests = mock_server.received_requests().await.unwrap();
    let ids: Vec<String> = requests
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["user_id"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], ids[1]);
    assert!(ids[0].starts_with("user_"));
}

#[tokio::test]
async fn test_server_error_and_outage_texts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut app = memory_app();
    exchange(&mut app, Arc::new(service_for(&mock_server)), "oi").await;
    assert_eq!(app.transcript.entries().last().unwrap().content(), APOLOGY_TEXT);

    let offline = HttpChatService::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    exchange(&mut app, Arc::new(offline), "still there?").await;
    assert_eq!(
        app.transcript.entries().last().unwrap().content(),
        CONNECTIVITY_TEXT
    );
    assert_eq!(app.transcript.messages().count(), 4);
}
