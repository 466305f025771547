//! Error types for the Numina domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Numina operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Remote assistant errors ---
    #[error("Assistant gateway error: {0}")]
    Gateway(#[from] GatewayError),

    // --- Conversation session errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures talking to the external conversational-AI backend.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The backend answered with a non-success HTTP status.
    #[error("Assistant API error {status_code}: {status_text}")]
    UpstreamStatus {
        status_code: u16,
        status_text: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered 2xx but the body was not JSON.
    #[error("Malformed assistant response: {0}")]
    MalformedResponse(String),

    #[error("Assistant not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Conversation not found: {0}")]
    NotFound(String),
}
