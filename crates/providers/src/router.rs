//! Gateway selection from configuration.

use std::sync::Arc;

use numina_core::error::GatewayError;
use numina_core::gateway::AssistantGateway;

use crate::watson::WatsonGateway;

/// Build the configured remote assistant gateway.
///
/// Incomplete assistant settings still produce a gateway; its calls fail
/// with `NotConfigured` so callers can surface the problem per turn.
pub fn build_from_config(
    config: &numina_config::AppConfig,
) -> Result<Arc<dyn AssistantGateway>, GatewayError> {
    if !config.assistant.is_configured() {
        tracing::warn!(
            missing = %config.assistant.missing_fields().join(", "),
            "Remote assistant is not fully configured"
        );
    }
    Ok(Arc::new(WatsonGateway::new(config.assistant.clone())?))
}
