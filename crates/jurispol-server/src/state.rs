//! Shared application state.

use std::sync::Arc;

use jurispol_chat::{GeminiClient, GenerativeModel, Relay};
use jurispol_core::JurisPolConfig;
use tracing::{error, info};

/// Shared application state accessible from all route handlers.
/// Read-only after startup; requests share nothing mutable.
pub struct AppState {
    pub config: JurisPolConfig,
    pub relay: Relay,
}

impl AppState {
    /// Build state with the Gemini provider. A missing key leaves the relay
    /// unconfigured: static hosting keeps working, `/api/chat` answers 500.
    pub fn new(config: JurisPolConfig) -> Self {
        let model = GeminiClient::from_config(&config)
            .map(|client| Arc::new(client) as Arc<dyn GenerativeModel>);

        match &model {
            Some(m) => info!("Provider configured (model {})", m.model()),
            None => error!(
                "CRITICAL: no API_KEY found in the environment; chat requests will fail until it is set"
            ),
        }

        Self::with_relay(config, Relay::new(model))
    }

    pub fn with_relay(config: JurisPolConfig, relay: Relay) -> Self {
        Self { config, relay }
    }
}
