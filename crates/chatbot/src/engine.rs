//! The two answering strategies behind [`ConversationEngine`].

use std::sync::Arc;

use async_trait::async_trait;
use numina_core::{
    AssistantGateway, AssistantRequest, ConversationEngine, KnowledgeLevel, Message, Result,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use crate::onboarding::OnboardingState;

/// Shown when the remote assistant cannot be reached.
pub const CONNECTION_ISSUE_REPLY: &str = "⚠️ Connection issue with the assistant service.";

/// Shown when the remote assistant answers with nothing.
const EMPTY_REPLY: &str = "Sorry, I didn’t get that.";

struct LocalState {
    onboarding: OnboardingState,
    classifier: Classifier,
}

/// Deterministic offline answers: onboarding first, then the rule classifier.
pub struct LocalRuleStrategy {
    state: Mutex<LocalState>,
}

impl LocalRuleStrategy {
    /// A first-time user: onboarding starts at the goal question.
    pub fn new() -> Self {
        Self::with_onboarding(OnboardingState::new())
    }

    /// A returning user who already chose a knowledge level.
    pub fn returning(level: KnowledgeLevel) -> Self {
        Self::with_onboarding(OnboardingState::completed(level))
    }

    pub fn with_onboarding(onboarding: OnboardingState) -> Self {
        Self {
            state: Mutex::new(LocalState {
                onboarding,
                classifier: Classifier::new(),
            }),
        }
    }

    pub async fn onboarding(&self) -> OnboardingState {
        self.state.lock().await.onboarding.clone()
    }

    pub async fn unknown_streak(&self) -> u32 {
        self.state.lock().await.classifier.streak().count()
    }
}

impl Default for LocalRuleStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationEngine for LocalRuleStrategy {
    fn name(&self) -> &str {
        "local"
    }

    async fn respond(&self, input: &str) -> Result<Message> {
        let mut state = self.state.lock().await;

        if !state.onboarding.is_complete() {
            let (next, reply) = state.onboarding.advance(input);
            if next.step != state.onboarding.step {
                info!(from = ?state.onboarding.step, to = ?next.step, "Onboarding advanced");
            }
            state.onboarding = next;
            return Ok(reply);
        }

        let level = state.onboarding.knowledge_level;
        Ok(state.classifier.classify(input, level).message)
    }
}

/// Free text forwarded to the remote assistant.
pub struct RemoteGatewayStrategy {
    gateway: Arc<dyn AssistantGateway>,
    session_id: Mutex<Option<String>>,
}

impl RemoteGatewayStrategy {
    pub fn new(gateway: Arc<dyn AssistantGateway>) -> Self {
        Self {
            gateway,
            session_id: Mutex::new(None),
        }
    }

    pub async fn session_id(&self) -> Option<String> {
        self.session_id.lock().await.clone()
    }
}

#[async_trait]
impl ConversationEngine for RemoteGatewayStrategy {
    fn name(&self) -> &str {
        "remote"
    }

    /// Never fails: transport and upstream errors become a bot message.
    async fn respond(&self, input: &str) -> Result<Message> {
        let mut session = self.session_id.lock().await;

        let mut request = AssistantRequest::new(input);
        request.session_id = session.clone();

        debug!(gateway = self.gateway.name(), chars = input.chars().count(), "Forwarding to assistant");

        match self.gateway.send(request).await {
            Ok(reply) => {
                if session.is_none() {
                    *session = reply.session_id;
                }
                let text = if reply.reply.is_empty() {
                    EMPTY_REPLY.to_string()
                } else {
                    reply.reply
                };
                Ok(Message::bot(text))
            }
            Err(e) => {
                warn!(gateway = self.gateway.name(), error = %e, "Assistant request failed");
                Ok(Message::bot(CONNECTION_ISSUE_REPLY))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numina_core::{AssistantReply, GatewayError, Role};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies with a numbered echo and a fixed session id.
    struct ScriptedGateway {
        calls: AtomicUsize,
        seen_sessions: std::sync::Mutex<Vec<Option<String>>>,
    }

    impl ScriptedGateway {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen_sessions: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AssistantGateway for ScriptedGateway {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&self, request: AssistantRequest) -> std::result::Result<AssistantReply, GatewayError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_sessions.lock().unwrap().push(request.session_id);
            Ok(AssistantReply {
                reply: format!("reply {n}: {}", request.message),
                session_id: Some(format!("session-{n}")),
            })
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl AssistantGateway for FailingGateway {
        fn name(&self) -> &str {
            "failing"
        }

        async fn send(&self, _: AssistantRequest) -> std::result::Result<AssistantReply, GatewayError> {
            Err(GatewayError::UpstreamStatus {
                status_code: 503,
                status_text: "Service Unavailable".into(),
            })
        }
    }

    #[tokio::test]
    async fn local_strategy_onboards_then_classifies() {
        let local = LocalRuleStrategy::new();
        for input in ["save for a car", "saving", "start"] {
            local.respond(input).await.unwrap();
        }
        let welcome = local.respond("beginner").await.unwrap();
        assert!(welcome.content.contains("step by step"));
        assert!(local.onboarding().await.is_complete());

        let referral = local.respond("What stocks should I buy?").await.unwrap();
        assert_eq!(referral.role, Role::Referral);
    }

    #[tokio::test]
    async fn returning_user_skips_onboarding() {
        let local = LocalRuleStrategy::returning(KnowledgeLevel::Advanced);
        let reply = local.respond("tell me about investing").await.unwrap();
        assert!(reply.content.contains("Regulatory Compliance"));
    }

    #[tokio::test]
    async fn local_strategy_tracks_unknown_streak() {
        let local = LocalRuleStrategy::returning(KnowledgeLevel::Beginner);
        local.respond("asdf").await.unwrap();
        local.respond("qwerty").await.unwrap();
        assert_eq!(local.unknown_streak().await, 2);
        local.respond("zzz").await.unwrap();
        assert_eq!(local.unknown_streak().await, 0);
    }

    #[tokio::test]
    async fn remote_strategy_remembers_first_session_id() {
        let gateway = Arc::new(ScriptedGateway::new());
        let remote = RemoteGatewayStrategy::new(gateway.clone());

        let first = remote.respond("hello").await.unwrap();
        assert_eq!(first.content, "reply 0: hello");
        remote.respond("again").await.unwrap();

        assert_eq!(remote.session_id().await.as_deref(), Some("session-0"));
        let seen = gateway.seen_sessions.lock().unwrap().clone();
        assert_eq!(seen, vec![None, Some("session-0".to_string())]);
    }

    #[tokio::test]
    async fn remote_failure_becomes_connection_message() {
        let remote = RemoteGatewayStrategy::new(Arc::new(FailingGateway));
        let reply = remote.respond("hello").await.unwrap();
        assert_eq!(reply.role, Role::Bot);
        assert_eq!(reply.content, CONNECTION_ISSUE_REPLY);
        assert!(remote.session_id().await.is_none());
    }
}
