//! The chat orchestrator.

use std::sync::Arc;
use std::time::Duration;

use numina_config::ChatbotConfig;
use numina_core::{AssistantGateway, Conversation, ConversationEngine, ConversationId, Message, Result};
use rand::Rng;
use tracing::debug;

use crate::engine::{LocalRuleStrategy, RemoteGatewayStrategy};
use crate::session::{HistoryWindow, SessionManager};

/// Cosmetic pause before a local reply, uniformly random in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl TypingDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
        }
    }

    pub fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    pub fn sample(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::rng();
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self::new(800, 1600)
    }
}

/// One chat window's worth of state.
///
/// Quick replies always go to the local rules; typed text goes to the
/// free-text strategy, which is either the remote assistant or the same
/// local rules.
pub struct Chatbot {
    session: SessionManager,
    local: Arc<dyn ConversationEngine>,
    free_text: Arc<dyn ConversationEngine>,
    typing: TypingDelay,
}

impl Chatbot {
    pub fn new(
        local: Arc<dyn ConversationEngine>,
        free_text: Arc<dyn ConversationEngine>,
        typing: TypingDelay,
    ) -> Self {
        Self {
            session: SessionManager::new(),
            local,
            free_text,
            typing,
        }
    }

    /// Both input paths answered by one local rule engine.
    pub fn local_only(typing: TypingDelay) -> Self {
        let local: Arc<dyn ConversationEngine> = Arc::new(LocalRuleStrategy::new());
        Self::new(local.clone(), local, typing)
    }

    /// Wire strategies from the `[chatbot]` config section.
    pub fn from_config(config: &ChatbotConfig, gateway: Arc<dyn AssistantGateway>) -> Self {
        let typing = TypingDelay::new(config.typing_delay_min_ms, config.typing_delay_max_ms);
        let local: Arc<dyn ConversationEngine> = Arc::new(LocalRuleStrategy::new());
        let free_text: Arc<dyn ConversationEngine> = if config.uses_remote_free_text() {
            Arc::new(RemoteGatewayStrategy::new(gateway))
        } else {
            local.clone()
        };
        Self::new(local, free_text, typing)
    }

    pub fn free_text_strategy(&self) -> &str {
        self.free_text.name()
    }

    /// Handle a quick-reply selection.
    pub async fn quick_reply(&mut self, value: &str) -> Result<Message> {
        self.session.append(Message::user(value));

        let delay = self.typing.sample();
        debug!(delay_ms = delay.as_millis() as u64, "Typing");
        tokio::time::sleep(delay).await;

        let reply = self.local.respond(value).await?;
        self.session.append(reply.clone());
        Ok(reply)
    }

    /// Handle typed text. Blank input is ignored and returns `None`.
    pub async fn submit(&mut self, text: &str) -> Result<Option<Message>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.session.append(Message::user(text));

        let reply = self.free_text.respond(text).await?;
        self.session.append(reply.clone());
        Ok(Some(reply))
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn transcript(&self) -> &[Message] {
        self.session.transcript()
    }

    pub fn visible_messages(&self) -> Vec<&Message> {
        self.session.visible_messages()
    }

    pub fn dismiss_disclaimer(&mut self) {
        self.session.dismiss_disclaimer();
    }

    pub fn start_new(&mut self) -> ConversationId {
        self.session.start_new()
    }

    pub fn switch_to(&mut self, id: &ConversationId) -> Result<()> {
        Ok(self.session.switch_to(id)?)
    }

    pub fn history(&self, window: HistoryWindow) -> Vec<&Conversation> {
        self.session.list(window)
    }

    /// Quick replies offered by the last message, unless the user spoke last.
    pub fn pending_quick_replies(&self) -> &[numina_core::QuickReply] {
        match self.session.transcript().last() {
            Some(last) if last.role != numina_core::Role::User => last.quick_replies.as_slice(),
            _ => &[],
        }
    }
}
