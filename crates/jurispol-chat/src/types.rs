//! Chat types shared by the relay API and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Speaker of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Web citation returned alongside a grounded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// One entry of the visible transcript. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GroundingSource>>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            sources: None,
        }
    }

    /// Assistant reply; an empty source list is stored as `None`.
    pub fn assistant(content: impl Into<String>, sources: Vec<GroundingSource>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            sources: if sources.is_empty() { None } else { Some(sources) },
        }
    }
}

/// History entry as read by the relay. Extra fields sent by clients
/// (id, timestamp, sources) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A non-array `history` counts as empty; malformed entries are skipped.
fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<HistoryEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Outgoing request body built by the client.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingChat<'a> {
    pub history: &'a [Message],
    pub message: &'a str,
}

/// Successful relay answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

/// Error body returned by the relay for 4xx/5xx answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Relay status response.
#[derive(Debug, Clone, Serialize)]
pub struct ChatStatus {
    #[serde(rename = "providerConfigured")]
    pub provider_configured: bool,
    pub model: String,
    #[serde(rename = "searchGrounding")]
    pub search_grounding: bool,
}

/// Keep the first occurrence of every uri, preserving order.
pub fn dedupe_sources(sources: Vec<GroundingSource>) -> Vec<GroundingSource> {
    let mut unique: Vec<GroundingSource> = Vec::with_capacity(sources.len());
    for source in sources {
        if !unique.iter().any(|s| s.uri == source.uri) {
            unique.push(source);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(title: &str, uri: &str) -> GroundingSource {
        GroundingSource {
            title: title.into(),
            uri: uri.into(),
        }
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let sources = vec![
            source("A", "a"),
            source("B", "b"),
            source("A again", "a"),
        ];
        let unique = dedupe_sources(sources);
        assert_eq!(unique, vec![source("A", "a"), source("B", "b")]);
    }

    #[test]
    fn test_assistant_without_sources() {
        let msg = Message::assistant("hola", Vec::new());
        assert!(msg.sources.is_none());
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("sources").is_none());
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn test_request_tolerates_client_message_shape() {
        let req: ChatRequest = serde_json::from_value(serde_json::json!({
            "history": [{
                "id": "1",
                "role": "assistant",
                "content": "respuesta",
                "timestamp": "2024-01-01T00:00:00Z",
                "sources": [{"title": "T", "uri": "u"}],
            }],
            "message": "consulta",
        }))
        .unwrap();
        assert_eq!(req.history.len(), 1);
        assert_eq!(req.history[0].role, "assistant");
        assert_eq!(req.message.as_deref(), Some("consulta"));
    }

    #[test]
    fn test_non_array_history_is_empty() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"history": "nope", "message": "hola"}"#).unwrap();
        assert!(req.history.is_empty());
    }

    #[test]
    fn test_request_without_message() {
        let req: ChatRequest = serde_json::from_str(r#"{"history": []}"#).unwrap();
        assert!(req.message.is_none());
    }
}
