//! AssistantGateway trait: the abstraction over the remote conversational-AI
//! backend.
//!
//! The backend is opaque: it receives a user utterance plus an optional
//! session id and answers with a list of reply fragments. Implementations:
//! Watson Assistant v2 (in `numina-providers`), test doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// One turn sent to the remote assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantRequest {
    /// The user's utterance
    pub message: String,

    /// Session identifier carried between turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AssistantRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// The assistant's answer for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Single text reply (fragments already joined)
    pub reply: String,

    /// Echo of the session identifier used for this turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// The core gateway trait.
///
/// The HTTP proxy and the remote conversation strategy call `send()` without
/// knowing which backend is behind it.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// A human-readable name for this backend (e.g., "watson").
    fn name(&self) -> &str;

    /// Send one utterance and get the joined reply.
    async fn send(&self, request: AssistantRequest) -> std::result::Result<AssistantReply, GatewayError>;

    /// Check whether the backend is reachable and configured.
    async fn health_check(&self) -> std::result::Result<bool, GatewayError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl AssistantGateway for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn send(&self, request: AssistantRequest) -> Result<AssistantReply, GatewayError> {
            Ok(AssistantReply {
                reply: request.message,
                session_id: request.session_id,
            })
        }
    }

    #[tokio::test]
    async fn default_health_check_is_ok() {
        assert!(Echo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn session_id_round_trips_through_gateway() {
        let reply = Echo
            .send(AssistantRequest::new("hello").with_session("s-1"))
            .await
            .unwrap();
        assert_eq!(reply.reply, "hello");
        assert_eq!(reply.session_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn request_without_session_omits_field() {
        let json = serde_json::to_value(AssistantRequest::new("hi")).unwrap();
        assert!(json.get("session_id").is_none());
    }
}
