//! # Numina Core
//!
//! Domain types, traits, and error definitions for the Numina
//! financial-education assistant. This crate has **no framework
//! dependencies**: it defines the model the other crates implement against.
//!
//! ## Seams
//!
//! - [`ConversationEngine`]: one strategy for turning user input into a
//!   bot message (local rules or the remote assistant).
//! - [`AssistantGateway`]: the opaque request/response contract of the
//!   external conversational-AI backend.

pub mod engine;
pub mod error;
pub mod gateway;
pub mod message;
pub mod profile;

// Re-export key types at crate root for ergonomics
pub use engine::ConversationEngine;
pub use error::{Error, GatewayError, Result, SessionError};
pub use gateway::{AssistantGateway, AssistantReply, AssistantRequest};
pub use message::{Conversation, ConversationId, Message, QuickReply, Role};
pub use profile::KnowledgeLevel;
