//! `POST /api/chat`: a thin proxy in front of the remote assistant.
//!
//! Every outcome is a JSON `{reply}` body. Upstream failures come back as
//! 500 with the error folded into `reply`.

use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use numina_core::{AssistantRequest, GatewayError};

use crate::SharedState;

#[derive(Debug, Deserialize)]
struct ProxyRequest {
    message: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProxyResponse {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ProxyResponse {
    fn failure(reply: String) -> (StatusCode, Json<Self>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Self {
                reply,
                session_id: None,
            }),
        )
    }
}

/// Body text for a failed turn.
fn failure_reply(err: &GatewayError) -> String {
    match err {
        GatewayError::UpstreamStatus { .. } => err.to_string(),
        other => format!("Fatal server error: {other}"),
    }
}

pub(crate) async fn chat_proxy_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> (StatusCode, Json<ProxyResponse>) {
    let payload: ProxyRequest = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Unreadable chat request");
            return ProxyResponse::failure(format!("Fatal server error: {e}"));
        }
    };

    let session_id = payload
        .session_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    info!(
        session = %session_id,
        message_len = payload.message.len(),
        "Sending to assistant"
    );

    let request = AssistantRequest::new(payload.message).with_session(session_id.clone());
    match state.assistant.send(request).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(ProxyResponse {
                reply: reply.reply,
                session_id: Some(reply.session_id.unwrap_or(session_id)),
            }),
        ),
        Err(e) => {
            error!(error = %e, "Assistant request failed");
            ProxyResponse::failure(failure_reply(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockGateway, state_with, test_state};
    use axum::Router;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(state: SharedState) -> Router {
        Router::new()
            .route("/api/chat", post(chat_proxy_handler))
            .with_state(state)
    }

    async fn post_chat(app: Router, body: &str) -> (StatusCode, ProxyResponse) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn forwards_message_and_assigns_session() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = post_chat(
            app(test_state(dir.path())),
            r#"{"message": "What is a Roth IRA?"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.reply, "Mock reply to: What is a Roth IRA?");
        let session = body.session_id.unwrap();
        assert!(uuid::Uuid::parse_str(&session).is_ok());
    }

    #[tokio::test]
    async fn keeps_caller_session_id() {
        let dir = tempfile::tempdir().unwrap();
        let (_, body) = post_chat(
            app(test_state(dir.path())),
            r#"{"message": "hi", "session_id": "abc-123"}"#,
        )
        .await;
        assert_eq!(body.session_id.as_deref(), Some("abc-123"));
    }

    #[tokio::test]
    async fn upstream_status_becomes_500_with_reason() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = MockGateway {
            failure: Some(GatewayError::UpstreamStatus {
                status_code: 401,
                status_text: "Unauthorized".into(),
            }),
        };
        let (status, body) = post_chat(app(state_with(gateway, dir.path())), r#"{"message": "hi"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.reply, "Assistant API error 401: Unauthorized");
    }

    #[tokio::test]
    async fn transport_failure_is_fatal_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = MockGateway {
            failure: Some(GatewayError::Network("connection refused".into())),
        };
        let (status, body) = post_chat(app(state_with(gateway, dir.path())), r#"{"message": "hi"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.reply.starts_with("Fatal server error: "));
        assert!(body.reply.contains("connection refused"));
    }

    #[tokio::test]
    async fn malformed_body_is_fatal_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = post_chat(app(test_state(dir.path())), "not json").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.reply.starts_with("Fatal server error: "));
        assert!(body.session_id.is_none());
    }
}
