//! # Numina Chatbot
//!
//! The conversational core: a seeded message store, an ordered rule
//! classifier with a static knowledge base, the onboarding state machine,
//! conversation history, and the two answering strategies (local rules and
//! the remote assistant) behind [`numina_core::ConversationEngine`].
//!
//! [`Chatbot`] ties them together the way a chat window does: quick replies
//! always go to the local rules, typed text goes to the configured strategy.

pub mod bot;
pub mod classifier;
pub mod engine;
pub mod knowledge;
pub mod onboarding;
pub mod session;
pub mod store;

pub use bot::{Chatbot, TypingDelay};
pub use classifier::{Classification, Classifier, Topic};
pub use engine::{CONNECTION_ISSUE_REPLY, LocalRuleStrategy, RemoteGatewayStrategy};
pub use onboarding::{OnboardingState, OnboardingStep};
pub use session::{HistoryWindow, SessionManager};
pub use store::MessageStore;
