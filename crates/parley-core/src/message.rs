//! Transcript data model.
//!
//! A transcript is the ordered, append-only list of messages one session
//! has rendered. Placeholder bubbles are keyed by a per-submission token so
//! that each in-flight exchange resolves against its own bubble, never
//! someone else's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed text shown in a pending placeholder bubble.
pub const PENDING_TEXT: &str = "Assistant is composing a reply...";

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text the user typed.
    User,
    /// A server reply, or the pending bubble awaiting one.
    Assistant,
    /// A failed exchange, rendered inline.
    Error,
}

/// Identifier minted for each submission.
///
/// Tokens are unique within a session. At most one placeholder carrying a
/// given token exists in the transcript at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionToken(u64);

/// A single message in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Message text, always treated as literal content.
    pub text: String,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
    /// Set only on pending placeholder bubbles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<SubmissionToken>,
}

impl Message {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
            placeholder: None,
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Create an inline error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Role::Error, text)
    }

    /// Whether this message is a pending placeholder bubble.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }
}

/// Ordered, append-only sequence of messages.
///
/// Messages are immutable once appended, with one exception: a placeholder
/// bubble is removed (not mutated) when its exchange completes.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_token: u64,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages, placeholders included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get the most recently appended message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a user message.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    /// Append an assistant message.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(Message::assistant(text));
    }

    /// Append an inline error message.
    pub fn push_error(&mut self, text: impl Into<String>) {
        self.messages.push(Message::error(text));
    }

    /// Mint a fresh submission token without inserting a bubble.
    pub fn mint_token(&mut self) -> SubmissionToken {
        let token = SubmissionToken(self.next_token);
        self.next_token += 1;
        token
    }

    /// Append a pending placeholder bubble and return its token.
    pub fn push_placeholder(&mut self) -> SubmissionToken {
        let token = self.mint_token();
        let mut message = Message::assistant(PENDING_TEXT);
        message.placeholder = Some(token);
        self.messages.push(message);
        token
    }

    /// Remove the placeholder carrying `token`, if present.
    ///
    /// Other placeholders are untouched. Returns whether one was removed.
    pub fn remove_placeholder(&mut self, token: SubmissionToken) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.placeholder != Some(token));
        self.messages.len() != before
    }

    /// Number of placeholder bubbles currently visible.
    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_placeholder()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user("Hello");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.text, "Hello");
        assert!(!user.is_placeholder());

        let assistant = Message::assistant("Hi there");
        assert_eq!(assistant.role, Role::Assistant);

        let error = Message::error("it broke");
        assert_eq!(error.role, Role::Error);
    }

    #[test]
    fn test_append_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("first");
        transcript.push_assistant("second");
        transcript.push_error("third");

        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Error]);
        assert_eq!(transcript.last().unwrap().text, "third");
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut transcript = Transcript::new();
        let a = transcript.mint_token();
        let b = transcript.push_placeholder();
        let c = transcript.mint_token();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_placeholder_text_and_flag() {
        let mut transcript = Transcript::new();
        let token = transcript.push_placeholder();

        let bubble = transcript.last().unwrap();
        assert_eq!(bubble.role, Role::Assistant);
        assert_eq!(bubble.text, PENDING_TEXT);
        assert_eq!(bubble.placeholder, Some(token));
        assert_eq!(transcript.pending_count(), 1);
    }

    #[test]
    fn test_remove_placeholder_only_matches_its_token() {
        let mut transcript = Transcript::new();
        let first = transcript.push_placeholder();
        let second = transcript.push_placeholder();
        assert_eq!(transcript.pending_count(), 2);

        assert!(transcript.remove_placeholder(second));
        assert_eq!(transcript.pending_count(), 1);
        assert_eq!(transcript.last().unwrap().placeholder, Some(first));

        // Removing again is a no-op.
        assert!(!transcript.remove_placeholder(second));
        assert!(transcript.remove_placeholder(first));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_remove_with_unknown_token() {
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        let unused = transcript.mint_token();
        assert!(!transcript.remove_placeholder(unused));
        assert_eq!(transcript.len(), 1);
    }
}
