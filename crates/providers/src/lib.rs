//! Remote assistant gateway implementations for Numina.
//!
//! All gateways implement the `numina_core::AssistantGateway` trait.
//! `build_from_config` wires the configured backend.

pub mod router;
pub mod watson;

pub use router::build_from_config;
pub use watson::WatsonGateway;
