//! ConversationEngine trait: one strategy for answering user input.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// Turns one user input into one bot-side message.
///
/// Two strategies exist: the local rule engine (deterministic, offline) and
/// the remote assistant. The orchestrator chooses which one handles free text.
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Strategy name, used in logs ("local", "remote").
    fn name(&self) -> &str;

    /// Produce the reply for `input`. Implementations may keep per-session
    /// state (streak counters, remote session ids).
    async fn respond(&self, input: &str) -> Result<Message>;
}
