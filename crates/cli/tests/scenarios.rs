//! End-to-end scenarios across the Numina crates.
//!
//! These drive the chatbot the way the terminal and HTTP front ends do,
//! from first message through onboarding, classification, history and the
//! assistant proxy.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use numina_chatbot::{Chatbot, HistoryWindow, LocalRuleStrategy, SessionManager, TypingDelay};
use numina_config::AppConfig;
use numina_core::{
    AssistantGateway, AssistantReply, AssistantRequest, ConversationEngine, GatewayError, Message,
    Role,
};

// ── Helpers ──────────────────────────────────────────────────────────────

/// A backend that always refuses, standing in for a down assistant.
struct DownGateway;

#[async_trait::async_trait]
impl AssistantGateway for DownGateway {
    fn name(&self) -> &str {
        "down"
    }

    async fn send(&self, _request: AssistantRequest) -> Result<AssistantReply, GatewayError> {
        Err(GatewayError::Network("connection refused".into()))
    }
}

fn offline_config(dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.chatbot.free_text = "local".into();
    config.chatbot.typing_delay_min_ms = 0;
    config.chatbot.typing_delay_max_ms = 0;
    config.preferences.path = Some(dir.join("preferences.json"));
    config
}

async fn request(app: axum::Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ── Chatbot scenarios ────────────────────────────────────────────────────

#[tokio::test]
async fn onboarding_from_goal_to_personalised_welcome() {
    let mut bot = Chatbot::local_only(TypingDelay::none());

    let reply = bot.submit("save for a car").await.unwrap().unwrap();
    assert_eq!(reply.quick_replies.len(), 5);

    bot.quick_reply("saving").await.unwrap();
    let levels = bot.quick_reply("start").await.unwrap();
    assert_eq!(levels.quick_replies.len(), 3);

    let welcome = bot.quick_reply("beginner").await.unwrap();
    assert!(welcome.content.contains("step by step"));
    assert!(welcome.content.contains("Emergency Fund is 50% complete"));

    // After onboarding the classifier answers, and advisor topics are referred.
    let referral = bot.submit("What stocks should I buy?").await.unwrap().unwrap();
    assert_eq!(referral.role, Role::Referral);
    assert!(referral.requires_advisor);
}

#[tokio::test]
async fn three_misses_escalate_then_reset() {
    let engine = LocalRuleStrategy::returning(Default::default());

    let first = engine.respond("asdf").await.unwrap();
    let second = engine.respond("qwerty").await.unwrap();
    let third = engine.respond("zzz").await.unwrap();

    assert_eq!(first.quick_replies.len(), 4);
    assert_eq!(second.quick_replies.len(), 4);
    assert_ne!(first.quick_replies, second.quick_replies);
    assert_ne!(first.content, second.content);
    assert!(third.content.contains("Here's what I'm best at"));
    assert_eq!(engine.unknown_streak().await, 0);
}

#[tokio::test]
async fn remote_outage_shows_connection_warning_and_keeps_history() {
    let mut bot = Chatbot::from_config(&AppConfig::default().chatbot, Arc::new(DownGateway));

    let reply = bot.submit("What is compound interest?").await.unwrap().unwrap();
    assert_eq!(reply.role, Role::Bot);
    assert_eq!(reply.content, numina_chatbot::CONNECTION_ISSUE_REPLY);

    let saved = bot.history(HistoryWindow::Week);
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].preview(), "What is compound interest?");
}

#[test]
fn week_window_drops_stale_conversations() {
    let t0 = chrono::DateTime::from_timestamp_millis(1_760_000_000_000).unwrap();
    let mut session = SessionManager::new();
    session.append_at(Message::user("stale"), t0);
    session.start_new_at(t0);
    session.append_at(Message::user("fresh"), t0 + chrono::Duration::days(6));

    let now = t0 + chrono::Duration::days(7) + chrono::Duration::milliseconds(1);
    let listed = session.list_at(HistoryWindow::Week, now);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].preview(), "fresh");
}

// ── HTTP scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn offline_gateway_serves_chat_finance_and_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let state = Arc::new(numina_gateway::AppState::from_config(&config).unwrap());
    let app = numina_gateway::build_router(state, &config.gateway);

    let (status, body) = request(
        app.clone(),
        "POST",
        "/v1/chat/message",
        Some(r#"{"message": "save for a car"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"]["content"].as_str().unwrap().contains("great goal"));

    let (_, body) = request(app.clone(), "GET", "/v1/conversations", None).await;
    assert_eq!(body["window"], "month");
    assert_eq!(body["conversations"].as_array().unwrap().len(), 1);

    let (_, body) = request(app.clone(), "GET", "/v1/accounts", None).await;
    assert_eq!(body["accounts"].as_array().unwrap().len(), 3);

    let (status, _) = request(app.clone(), "POST", "/v1/preferences/theme/preset/forest", None).await;
    assert_eq!(status, StatusCode::OK);
    let saved = std::fs::read_to_string(dir.path().join("preferences.json")).unwrap();
    assert!(saved.contains("bgGradientStart"));
}

#[tokio::test]
async fn proxy_without_credentials_reports_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = offline_config(dir.path());
    let state = Arc::new(numina_gateway::AppState::from_config(&config).unwrap());
    let app = numina_gateway::build_router(state, &config.gateway);

    let (status, body) = request(app, "POST", "/api/chat", Some(r#"{"message": "hi"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["reply"]
            .as_str()
            .unwrap()
            .starts_with("Fatal server error: ")
    );
}

#[tokio::test]
async fn configured_history_window_drives_conversation_listing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = offline_config(dir.path());
    config.chatbot.history_window = "week".into();
    let state = Arc::new(numina_gateway::AppState::from_config(&config).unwrap());
    let app = numina_gateway::build_router(state, &config.gateway);

    let (status, body) = request(app, "GET", "/v1/conversations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"], "week");
}
