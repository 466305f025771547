//! The ordered, in-memory transcript of the active conversation.

use chrono::{DateTime, Utc};
use numina_core::{Message, QuickReply, Role};

pub const DISCLAIMER_TEXT: &str = "⚠️ IMPORTANT DISCLOSURE\n\nI'm Numina, an AI-powered educational tool designed to help you understand financial concepts. I am NOT a licensed financial advisor, tax professional, or legal expert.\n\n📋 What I can do:\n• Provide general financial education\n• Help you understand your account data\n• Explain financial concepts in simple terms\n• Suggest topics to discuss with professionals\n\n🚫 What I cannot do:\n• Provide personalized investment advice\n• Offer tax or legal guidance\n• Make specific financial recommendations\n• Replace professional financial advisors\n\n🔒 Privacy: Your data is used only to provide educational context and is never shared.\n\nFor complex financial decisions, I'll recommend consulting with a Certified Financial Planner® (CFP®) or other licensed professional.";

pub const WELCOME_TEXT: &str = "Hey there! 👋 I'm here to help you learn about personal finance and understand your account activity.\n\n💡 I can help you explore:\n• 📊 Basic budgeting concepts\n• 💰 General saving strategies\n• 📈 Investing fundamentals (educational only)\n• 💳 Credit score basics\n• 🎯 Goal-tracking insights\n• 📱 Your account activity overview\n\nWhat would you like to learn about today?";

/// Id of the welcome message in every seeded transcript.
pub const WELCOME_ID: &str = "1";

/// Number of messages a fresh transcript starts with.
pub const SEED_LEN: usize = 2;

fn welcome_quick_replies() -> Vec<QuickReply> {
    vec![
        QuickReply::new("📚 Learn budgeting basics", "Learn budgeting basics"),
        QuickReply::new("💰 Understand saving strategies", "Understand saving strategies"),
        QuickReply::new("📊 View my account summary", "View my account summary"),
        QuickReply::new("🎯 Explore financial goals", "Explore financial goals"),
        QuickReply::new("👤 When should I see an advisor?", "When should I see an advisor?"),
    ]
}

/// The two messages every conversation starts with, stamped `now`.
pub fn seed_messages(now: DateTime<Utc>) -> Vec<Message> {
    vec![
        Message::disclaimer(DISCLAIMER_TEXT).with_timestamp(now),
        Message::bot(WELCOME_TEXT)
            .with_id(WELCOME_ID)
            .with_timestamp(now)
            .with_quick_replies(welcome_quick_replies()),
    ]
}

#[derive(Debug, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// A store holding exactly the disclaimer and the welcome message.
    pub fn seeded() -> Self {
        Self::seeded_at(Utc::now())
    }

    pub fn seeded_at(now: DateTime<Utc>) -> Self {
        Self {
            messages: seed_messages(now),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Swap the whole transcript in one step.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn disclaimer(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.role == Role::Disclaimer)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_has_disclaimer_then_welcome() {
        let store = MessageStore::seeded();
        assert_eq!(store.len(), SEED_LEN);

        let msgs = store.messages();
        assert_eq!(msgs[0].id, "disclaimer");
        assert_eq!(msgs[0].role, Role::Disclaimer);
        assert_eq!(msgs[1].id, WELCOME_ID);
        assert_eq!(msgs[1].role, Role::Bot);
        assert_eq!(msgs[1].quick_replies.len(), 5);
    }

    #[test]
    fn push_appends_in_order() {
        let mut store = MessageStore::seeded();
        store.push(Message::user("hello"));
        store.push(Message::bot("hi"));
        assert_eq!(store.len(), 4);
        assert_eq!(store.last().unwrap().content, "hi");
    }

    #[test]
    fn replace_swaps_everything() {
        let mut store = MessageStore::seeded();
        store.replace(vec![Message::disclaimer(DISCLAIMER_TEXT)]);
        assert_eq!(store.len(), 1);
        assert!(store.disclaimer().is_some());
    }
}
