//! Message and Conversation domain types.
//!
//! These are the value objects that flow through the whole system:
//! the user types or taps a quick reply → an engine produces a bot message →
//! the session manager appends both to the active transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// The id of the conversation that exists before the user starts a new one.
    pub fn current() -> Self {
        Self("current".to_string())
    }

    /// A new id derived from the given instant (`conversation-<unix millis>`).
    pub fn from_time(now: DateTime<Utc>) -> Self {
        Self(format!("conversation-{}", now.timestamp_millis()))
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who a message belongs to, and how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The assistant
    Bot,
    /// The one-per-conversation legal disclosure
    Disclaimer,
    /// A referral to a licensed professional
    Referral,
}

/// A canned suggested input rendered as a button.
///
/// Selecting one is equivalent to typing `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub label: String,
    pub value: String,
}

impl QuickReply {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A single turn in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Suggested follow-up inputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_replies: Vec<QuickReply>,

    /// Set on referral messages for advisor-gated topics
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requires_advisor: bool,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            quick_replies: Vec::new(),
            requires_advisor: false,
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new bot message.
    pub fn bot(content: impl Into<String>) -> Self {
        Self::with_role(Role::Bot, content)
    }

    /// Create a referral message; always flagged `requires_advisor`.
    pub fn referral(content: impl Into<String>) -> Self {
        let mut msg = Self::with_role(Role::Referral, content);
        msg.requires_advisor = true;
        msg
    }

    /// Create the disclaimer message. Its id is fixed so every transcript
    /// can locate it.
    pub fn disclaimer(content: impl Into<String>) -> Self {
        let mut msg = Self::with_role(Role::Disclaimer, content);
        msg.id = "disclaimer".to_string();
        msg
    }

    /// Attach quick replies.
    pub fn with_quick_replies(mut self, replies: Vec<QuickReply>) -> Self {
        self.quick_replies = replies;
        self
    }

    /// Override the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A saved conversation: an ordered transcript plus its time bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// Timestamp of the first message
    pub started_at: DateTime<Utc>,

    /// When this conversation was last saved
    pub last_updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Snapshot a transcript under `id`, stamped as updated at `now`.
    pub fn snapshot(id: ConversationId, messages: Vec<Message>, now: DateTime<Utc>) -> Self {
        let started_at = messages.first().map(|m| m.timestamp).unwrap_or(now);
        Self {
            id,
            messages,
            started_at,
            last_updated_at: now,
        }
    }

    /// A short preview: the first 60 characters of the first user turn.
    pub fn preview(&self) -> String {
        self.messages
            .get(2)
            .map(|m| m.content.chars().take(60).collect())
            .unwrap_or_else(|| "New conversation".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referral_is_flagged() {
        let msg = Message::referral("see a CFP");
        assert_eq!(msg.role, Role::Referral);
        assert!(msg.requires_advisor);
    }

    #[test]
    fn bot_message_omits_empty_optionals_when_serialized() {
        let json = serde_json::to_value(Message::bot("hi")).unwrap();
        assert_eq!(json["role"], "bot");
        assert!(json.get("quick_replies").is_none());
        assert!(json.get("requires_advisor").is_none());
    }

    #[test]
    fn conversation_id_from_time_uses_millis() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(ConversationId::from_time(now).0, "conversation-1700000000123");
    }

    #[test]
    fn snapshot_starts_at_first_message() {
        let first = Message::disclaimer("legal");
        let started = first.timestamp;
        let later = started + chrono::Duration::minutes(5);
        let conv = Conversation::snapshot(ConversationId::current(), vec![first], later);
        assert_eq!(conv.started_at, started);
        assert_eq!(conv.last_updated_at, later);
    }

    #[test]
    fn preview_falls_back_without_user_turn() {
        let conv = Conversation::snapshot(
            ConversationId::current(),
            vec![Message::disclaimer("legal"), Message::bot("hello")],
            Utc::now(),
        );
        assert_eq!(conv.preview(), "New conversation");
    }
}
