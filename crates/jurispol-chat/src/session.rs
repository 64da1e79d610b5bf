//! Client-side conversation state.
//!
//! `ChatState` is the single owner of the transcript. It is only mutated by
//! the send / receive / fail / clear operations below.

use tracing::debug;

use crate::client::{ChatTransport, TransportError};
use crate::config::GENERIC_CLIENT_ERROR;
use crate::types::{ChatReply, Message, Role};

/// A send accepted by `begin_send`, waiting for the relay.
#[derive(Debug, Clone)]
pub struct PendingSend {
    /// Transcript before the new user message.
    pub history: Vec<Message>,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the user message and mark a send in flight.
    ///
    /// Returns `None` for blank input or while another send is pending.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        if text.trim().is_empty() || self.is_loading {
            return None;
        }

        let history = self.messages.clone();
        self.messages.push(Message::user(text));
        self.is_loading = true;
        self.error = None;

        Some(PendingSend {
            history,
            text: text.to_string(),
        })
    }

    pub fn complete(&mut self, reply: ChatReply) {
        self.messages.push(Message::assistant(reply.text, reply.sources));
        self.is_loading = false;
    }

    pub fn fail(&mut self, err: &TransportError) {
        self.is_loading = false;
        self.error = Some(if err.message.is_empty() {
            GENERIC_CLIENT_ERROR.to_string()
        } else {
            err.message.clone()
        });
    }

    /// Reset to an empty transcript with no pending send or error.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Full cycle: append the user message, call the relay, record the
    /// outcome. Returns `false` when the input was not sent at all.
    pub async fn send<T>(&mut self, transport: &T, text: &str) -> bool
    where
        T: ChatTransport + ?Sized,
    {
        let Some(pending) = self.begin_send(text) else {
            debug!("Send ignored (blank input or request in flight)");
            return false;
        };

        match transport.send_message(&pending.history, &pending.text).await {
            Ok(reply) => self.complete(reply),
            Err(e) => self.fail(&e),
        }
        true
    }

    /// Last `limit` user prompts, oldest first.
    pub fn recent_queries(&self, limit: usize) -> Vec<&str> {
        let queries: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect();
        let skip = queries.len().saturating_sub(limit);
        queries[skip..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TransportErrorKind;
    use crate::types::GroundingSource;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Replies from a script and records the history it was handed.
    struct ScriptedTransport {
        replies: Mutex<Vec<Result<ChatReply, TransportError>>>,
        seen_history: Mutex<Vec<usize>>,
    }

    impl ScriptedTransport {
        fn new(mut replies: Vec<Result<ChatReply, TransportError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                seen_history: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send_message(
            &self,
            history: &[Message],
            _input: &str,
        ) -> Result<ChatReply, TransportError> {
            self.seen_history.lock().unwrap().push(history.len());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .expect("no scripted reply left")
        }
    }

    fn reply(text: &str, sources: Vec<GroundingSource>) -> Result<ChatReply, TransportError> {
        Ok(ChatReply {
            text: text.into(),
            sources,
        })
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let transport = ScriptedTransport::new(vec![
            reply("uno", Vec::new()),
            reply(
                "dos",
                vec![GroundingSource {
                    title: "Ley 1801".into(),
                    uri: "https://ley".into(),
                }],
            ),
        ]);
        let mut state = ChatState::new();

        assert!(state.send(&transport, "primera").await);
        assert!(state.send(&transport, "segunda").await);

        let roles: Vec<Role> = state.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(state.messages[3].content, "dos");
        assert!(state.messages[1].sources.is_none());
        assert_eq!(state.messages[3].sources.as_ref().unwrap().len(), 1);
        assert!(!state.is_loading);
        assert!(state.error.is_none());

        // history excludes the message being sent
        assert_eq!(*transport.seen_history.lock().unwrap(), vec![0, 2]);

        let ids: HashSet<&str> = state.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), state.messages.len());
    }

    #[tokio::test]
    async fn test_blank_input_never_sends() {
        let transport = ScriptedTransport::new(Vec::new());
        let mut state = ChatState::new();

        assert!(!state.send(&transport, "").await);
        assert!(!state.send(&transport, "   \n\t").await);
        assert!(state.messages.is_empty());
        assert!(transport.seen_history.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_overlapping_sends() {
        let mut state = ChatState::new();
        assert!(state.begin_send("hola").is_some());
        assert!(state.begin_send("otra").is_none());
        assert_eq!(state.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_sets_error() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::network())]);
        let mut state = ChatState::new();

        assert!(state.send(&transport, "hola").await);
        assert_eq!(state.messages.len(), 1);
        assert!(!state.is_loading);
        assert_eq!(
            state.error.as_deref(),
            Some(crate::config::BACKEND_UNREACHABLE)
        );
    }

    #[test]
    fn test_fail_with_empty_message_uses_generic_text() {
        let mut state = ChatState::new();
        state.begin_send("hola");
        state.fail(&TransportError {
            kind: TransportErrorKind::Http,
            message: String::new(),
            detail: None,
            status: Some(500),
        });
        assert_eq!(state.error.as_deref(), Some(GENERIC_CLIENT_ERROR));
    }

    #[test]
    fn test_new_send_clears_previous_error() {
        let mut state = ChatState::new();
        state.begin_send("hola");
        state.fail(&TransportError::network());
        assert!(state.error.is_some());

        state.begin_send("de nuevo");
        assert!(state.error.is_none());
        assert!(state.is_loading);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = ChatState::new();
        state.begin_send("hola");
        state.fail(&TransportError::network());
        state.begin_send("otra");

        state.clear();
        assert!(state.messages.is_empty());
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_recent_queries() {
        let mut state = ChatState::new();
        for i in 0..7 {
            state.begin_send(&format!("consulta {}", i));
            state.complete(ChatReply {
                text: "ok".into(),
                sources: Vec::new(),
            });
        }
        let recent = state.recent_queries(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0], "consulta 2");
        assert_eq!(recent[4], "consulta 6");
    }
}
