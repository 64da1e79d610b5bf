//! Chat relay: reshape a client conversation into one provider call and
//! normalize the answer into `{text, sources}`.
//!
//! Stateless per request. The client owns the history and resends it in full.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{FALLBACK_REPLY, SYSTEM_INSTRUCTION};
use crate::providers::{Content, Generation, GenerationRequest, GenerativeModel, ProviderError};
use crate::types::{dedupe_sources, ChatReply, ChatRequest, GroundingSource, HistoryEntry};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("message is required")]
    MissingMessage,

    #[error("no provider API key configured")]
    Unconfigured,

    #[error("provider quota exhausted: {0}")]
    Quota(String),

    #[error("{0}")]
    Upstream(String),
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        if err.is_quota_exhausted() {
            RelayError::Quota(err.to_string())
        } else {
            RelayError::Upstream(err.to_string())
        }
    }
}

/// Forwards chat requests to a generative model with search grounding.
#[derive(Clone)]
pub struct Relay {
    model: Option<Arc<dyn GenerativeModel>>,
    system_instruction: String,
}

impl Relay {
    pub fn new(model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self {
            model,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.model())
    }

    /// Run one request/response cycle against the provider.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatReply, RelayError> {
        let message = match request.message {
            Some(m) if !m.is_empty() => m,
            _ => return Err(RelayError::MissingMessage),
        };

        let Some(model) = self.model.as_ref() else {
            warn!("Chat request rejected: provider not configured");
            return Err(RelayError::Unconfigured);
        };

        let generation_request = GenerationRequest {
            system_instruction: self.system_instruction.clone(),
            contents: build_contents(&request.history, &message),
            search: true,
        };

        info!(
            "Querying {} ({} history turns)",
            model.model(),
            request.history.len()
        );

        match model.generate(generation_request).await {
            Ok(generation) => {
                let reply = normalize(generation);
                info!("Reply generated ({} sources)", reply.sources.len());
                Ok(reply)
            }
            Err(e) => {
                error!("Provider call failed: {}", e);
                Err(e.into())
            }
        }
    }
}

/// History in provider shape with the new message as the final user turn.
pub fn build_contents(history: &[HistoryEntry], message: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|entry| {
            let role = if entry.role == "user" { "user" } else { "model" };
            Content::text(role, entry.content.clone())
        })
        .collect();
    contents.push(Content::text("user", message));
    contents
}

/// Text with fallback, plus web citations that carry both uri and title.
pub fn normalize(generation: Generation) -> ChatReply {
    let sources = generation
        .grounding_chunks
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .filter_map(|web| match (web.uri, web.title) {
            (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => {
                Some(GroundingSource { title, uri })
            }
            _ => None,
        })
        .collect();

    ChatReply {
        text: generation
            .text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
        sources: dedupe_sources(sources),
    }
}
