//! Domain types for conversation and FAQ storage
//!
//! These are the records the relay persists and serves over HTTP: a
//! per-user [`Conversation`] holding an append-only sequence of
//! [`Message`]s, and curated [`Faq`] entries used for direct replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The end user
    User,
    /// The relay (FAQ answer, AI reply, or fixed default)
    Bot,
}

/// A single chat message
///
/// Messages are immutable once created; ordering within a conversation
/// is append order and messages are never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message author
    pub sender: Sender,
    /// Message text
    pub text: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new user message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use faqrelay::storage::{Message, Sender};
    ///
    /// let msg = Message::user("hello");
    /// assert_eq!(msg.sender, Sender::User);
    /// ```
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a new bot message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use faqrelay::storage::{Message, Sender};
    ///
    /// let msg = Message::bot("9-5 Mon-Fri");
    /// assert_eq!(msg.sender, Sender::Bot);
    /// ```
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// The full ordered message history for one user identity
///
/// Exactly one conversation exists per `user_id`. Conversations are
/// created lazily on the first message from a new user and never
/// destroyed; `updated_at` is bumped on every append and is
/// monotonically non-decreasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable client-supplied user identity (unique key)
    pub user_id: String,
    /// Append-only message sequence
    pub messages: Vec<Message>,
    /// Creation time, preserved across updates
    pub created_at: DateTime<Utc>,
    /// Last append time
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates a new empty conversation bound to `user_id`
    ///
    /// The conversation is not persisted until it is saved through the
    /// storage layer.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message and bumps `updated_at`
    ///
    /// # Examples
    ///
    /// ```
    /// use faqrelay::storage::{Conversation, Message};
    ///
    /// let mut conversation = Conversation::new("user-1");
    /// conversation.push(Message::user("hi"));
    /// assert_eq!(conversation.messages.len(), 1);
    /// ```
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }
}

/// A curated question/answer pair used for deterministic direct replies
///
/// FAQ questions are unique at the store boundary; records are created
/// via the admin upload path and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    /// Question text (unique key, matched as a lowercase substring)
    pub question: String,
    /// Canned answer returned when the question matches
    pub answer: String,
    /// Free-form labels for admin organization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Faq {
    /// Creates a new FAQ record stamped with the current time
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            tags,
            created_at: Utc::now(),
        }
    }
}
