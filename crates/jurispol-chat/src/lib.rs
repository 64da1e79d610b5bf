//! JurisPol chat: legal-assistant relay over a hosted generative model with
//! web-search grounding, plus the client-side conversation state and the
//! transport that talks to the relay.

pub mod client;
pub mod config;
pub mod providers;
pub mod relay;
pub mod session;
pub mod types;

pub use client::{ChatTransport, RelayClient, TransportError, TransportErrorKind};
pub use providers::{GeminiClient, GenerativeModel, ProviderError};
pub use relay::{Relay, RelayError};
pub use session::ChatState;
pub use types::*;
