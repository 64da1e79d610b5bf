//! Client transport to the relay.
//!
//! One attempt per send, no retries. Failures come back as a typed
//! `TransportError` rather than a free-form string.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BACKEND_UNREACHABLE;
use crate::types::{dedupe_sources, ChatReply, ErrorBody, Message, OutgoingChat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Relay answered with a non-2xx status.
    Http,
    /// Relay could not be reached.
    Network,
    /// Relay reported provider quota exhaustion (HTTP 429).
    Quota,
}

#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    /// User-facing text.
    pub message: String,
    /// Provider or relay detail, when the relay sent one.
    pub detail: Option<String>,
    pub status: Option<u16>,
}

impl TransportError {
    pub fn network() -> Self {
        Self {
            kind: TransportErrorKind::Network,
            message: BACKEND_UNREACHABLE.to_string(),
            detail: None,
            status: None,
        }
    }

    /// Build from a relay error response. `details` wins over `error`;
    /// a non-JSON body is appended as-is.
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut message = format!("Error del servidor ({})", status);
        let detail = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.details.or(parsed.error),
            Err(_) => {
                let text = body.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
        };
        if let Some(d) = &detail {
            message.push_str(": ");
            message.push_str(d);
        }

        let kind = if status == StatusCode::TOO_MANY_REQUESTS.as_u16() {
            TransportErrorKind::Quota
        } else {
            TransportErrorKind::Http
        };

        Self {
            kind,
            message,
            detail,
            status: Some(status),
        }
    }
}

/// Anything that can carry a chat turn to the relay.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        history: &[Message],
        input: &str,
    ) -> Result<ChatReply, TransportError>;
}

/// HTTP client for `POST /api/chat`.
#[derive(Clone)]
pub struct RelayClient {
    http: Client,
    endpoint: String,
}

impl RelayClient {
    /// `base_url` is the relay origin, e.g. `http://127.0.0.1:3001`.
    pub fn new(base_url: &str) -> jurispol_core::Result<Self> {
        let base = base_url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(jurispol_core::Error::Config(format!(
                "relay URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        let http = Client::builder()
            .build()
            .map_err(|e| jurispol_core::Error::Http(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: format!("{}/api/chat", base),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for RelayClient {
    async fn send_message(
        &self,
        history: &[Message],
        input: &str,
    ) -> Result<ChatReply, TransportError> {
        debug!("POST {} ({} history messages)", self.endpoint, history.len());

        let response = self
            .http
            .post(&self.endpoint)
            .json(&OutgoingChat {
                history,
                message: input,
            })
            .send()
            .await
            .map_err(|e| {
                warn!("Relay unreachable: {}", e);
                TransportError::network()
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Failed reading relay response: {}", e);
            TransportError::network()
        })?;

        if !status.is_success() {
            return Err(TransportError::from_response(status.as_u16(), &body));
        }

        let reply: ChatReply = serde_json::from_str(&body).map_err(|e| TransportError {
            kind: TransportErrorKind::Http,
            message: format!("Respuesta inválida del servidor: {}", e),
            detail: Some(body.clone()),
            status: Some(status.as_u16()),
        })?;

        Ok(ChatReply {
            text: reply.text,
            sources: dedupe_sources(reply.sources),
        })
    }
}
