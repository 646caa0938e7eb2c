//! In-memory state of one chat session: turns, draft, loading flag and
//! pending notifications.
//!
//! At most one request is outstanding. [`Conversation::begin_submit`]
//! refuses while loading, and [`Conversation::submit`] holds `&mut self`
//! across the await.

use crate::chat::ChatResponse;

use super::client::{ChatClient, ClientError};
use super::message::{Message, Role};

pub const FAILURE_TITLE: &str = "Error";
pub const FAILURE_DESCRIPTION: &str = "Failed to get a response. Please try again.";
pub const WELCOME_TITLE: &str = "Ask me anything about nutrition";
pub const WELCOME_DESCRIPTION: &str = "I'm here to answer your questions about human nutrition based on the \
knowledge base. Try asking about vitamins, minerals, or dietary recommendations.";

/// A toast shown to the user. Request failures are always destructive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notification {
    pub fn request_failed() -> Self {
        Self {
            title: FAILURE_TITLE.to_string(),
            description: FAILURE_DESCRIPTION.to_string(),
            destructive: true,
        }
    }
}

/// Enter submits; Shift+Enter inserts a newline.
pub fn should_submit_on_key(key: &str, shift: bool) -> bool {
    key == "Enter" && !shift
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    draft: String,
    loading: bool,
    notifications: Vec<Notification>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The welcome panel stands in for the transcript until the first turn.
    pub fn show_welcome(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn show_typing_indicator(&self) -> bool {
        self.loading
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.draft.trim().is_empty()
    }

    /// Takes the trimmed draft as the next query and records the user turn.
    /// `None` when the draft is blank or a request is already pending.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let query = self.draft.trim().to_string();
        self.draft.clear();
        self.messages.push(Message::user(query.clone()));
        self.loading = true;
        Some(query)
    }

    pub fn settle(&mut self, outcome: Result<ChatResponse, ClientError>) {
        match outcome {
            Ok(response) => {
                self.messages
                    .push(Message::assistant(response.answer, response.sources));
            }
            Err(err) => {
                tracing::error!("Chat request failed: {}", err);
                self.notifications.push(Notification::request_failed());
            }
        }
        self.loading = false;
    }

    /// Sends the draft through `client`. Returns false when nothing was sent.
    pub async fn submit(&mut self, client: &dyn ChatClient) -> bool {
        let Some(query) = self.begin_submit() else {
            return false;
        };
        let outcome = client.send(&query).await;
        self.settle(outcome);
        true
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::{PageRef, Source};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClient {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingClient {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl ChatClient for CountingClient {
        async fn send(&self, message: &str) -> Result<ChatResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::Status {
                    status: 500,
                    body: String::new(),
                });
            }
            Ok(ChatResponse {
                answer: format!("About {message} [1]."),
                sources: vec![Source {
                    id: 1,
                    content: "chunk".to_string(),
                    page: PageRef::Number(3.into()),
                    similarity: 0.9,
                    chunk_index: None,
                }],
            })
        }
    }

    #[tokio::test]
    async fn successful_submit_appends_user_then_assistant() {
        let client = CountingClient::new(false);
        let mut conversation = Conversation::new();
        conversation.set_draft("  zinc  ");

        assert!(conversation.submit(&client).await);

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("zinc"));
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "About zinc [1].");
        assert_eq!(messages[1].sources().len(), 1);
        assert!(!conversation.is_loading());
        assert_eq!(conversation.draft(), "");
        assert!(conversation.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn failed_submit_notifies_and_appends_nothing() {
        let client = CountingClient::new(true);
        let mut conversation = Conversation::new();
        conversation.set_draft("zinc");

        assert!(conversation.submit(&client).await);

        assert_eq!(conversation.messages(), &[Message::user("zinc")]);
        assert!(!conversation.is_loading());
        assert_eq!(
            conversation.take_notifications(),
            vec![Notification {
                title: "Error".to_string(),
                description: "Failed to get a response. Please try again.".to_string(),
                destructive: true,
            }]
        );
        assert!(conversation.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn blank_draft_sends_nothing() {
        let client = CountingClient::new(false);
        let mut conversation = Conversation::new();
        conversation.set_draft("   ");

        assert!(!conversation.can_submit());
        assert!(!conversation.submit(&client).await);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert!(conversation.messages().is_empty());
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut conversation = Conversation::new();
        conversation.set_draft("first");
        assert_eq!(conversation.begin_submit().as_deref(), Some("first"));
        assert!(conversation.show_typing_indicator());

        conversation.set_draft("second");
        assert!(!conversation.can_submit());
        assert_eq!(conversation.begin_submit(), None);
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.draft(), "second");

        conversation.settle(Ok(ChatResponse {
            answer: "done".to_string(),
            sources: Vec::new(),
        }));
        assert!(!conversation.show_typing_indicator());
        assert!(conversation.can_submit());
    }

    #[test]
    fn last_assistant_skips_user_turns() {
        let mut conversation = Conversation::new();
        assert!(conversation.last_assistant().is_none());

        conversation.set_draft("q");
        conversation.begin_submit();
        conversation.settle(Ok(ChatResponse {
            answer: "a".to_string(),
            sources: Vec::new(),
        }));
        conversation.set_draft("q2");
        conversation.begin_submit();

        assert_eq!(conversation.last_assistant().unwrap().content, "a");
    }

    #[test]
    fn welcome_shows_only_before_the_first_turn() {
        let mut conversation = Conversation::new();
        assert!(conversation.show_welcome());

        conversation.set_draft("q");
        conversation.begin_submit();
        assert!(!conversation.show_welcome());
    }

    #[test]
    fn enter_without_shift_submits() {
        assert!(should_submit_on_key("Enter", false));
        assert!(!should_submit_on_key("Enter", true));
        assert!(!should_submit_on_key("a", false));
    }
}
