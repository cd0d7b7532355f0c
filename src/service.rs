//! Conversation service for FaqRelay
//!
//! The orchestrator that turns an incoming user message into a bot
//! reply: load-or-create the conversation, append the user message,
//! run the resolution pipeline against a fresh FAQ read, fall back to
//! the AI client or the fixed default, append the bot reply, persist.
//! This service owns conversation mutation exclusively; no other
//! component appends messages.

use crate::error::{RelayError, Result};
use crate::fallback::{FallbackClient, DEFAULT_REPLY};
use crate::resolve::{resolve, ReplyOutcome};
use crate::storage::{Conversation, Message, SqliteStorage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Orchestrates message handling for the chat relay
pub struct ChatService {
    storage: Arc<SqliteStorage>,
    fallback: Option<FallbackClient>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChatService {
    /// Create a new chat service
    ///
    /// # Arguments
    ///
    /// * `storage` - Conversation and FAQ store
    /// * `fallback` - AI fallback client, or `None` when no credential
    ///   is configured (unmatched messages then get the fixed default)
    pub fn new(storage: Arc<SqliteStorage>, fallback: Option<FallbackClient>) -> Self {
        Self {
            storage,
            fallback,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one inbound chat message and produce the reply
    ///
    /// Steps, in order: validate inputs, load or lazily create the
    /// conversation, append the user message, resolve against the FAQ
    /// set (read fresh on every call so FAQ uploads take effect
    /// immediately), obtain the reply, append it, persist. Persistence
    /// is the single write point; if it fails the computed reply is
    /// not returned and the whole operation reports failure.
    ///
    /// Requests for the same user are serialized on a per-user lock so
    /// concurrent messages cannot lose appends between load and save.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] if `user_id` or `message` is
    /// empty (before any side effect), or [`RelayError::Storage`] if
    /// the final save fails.
    pub async fn handle_message(&self, user_id: &str, message: &str) -> Result<String> {
        if user_id.is_empty() || message.is_empty() {
            return Err(
                RelayError::Validation("User ID and message are required.".to_string()).into(),
            );
        }

        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let mut conversation = self
            .storage
            .load_conversation(user_id)?
            .unwrap_or_else(|| Conversation::new(user_id));

        conversation.push(Message::user(message));

        let faqs = self.storage.list_faqs()?;
        let reply = match resolve(message, &faqs) {
            ReplyOutcome::FaqMatch(answer) => {
                tracing::debug!("FAQ match for user {}", user_id);
                answer
            }
            ReplyOutcome::NeedsAiFallback => match &self.fallback {
                Some(client) => {
                    tracing::debug!("No FAQ match for user {}, querying AI fallback", user_id);
                    client.generate(message).await
                }
                None => {
                    tracing::debug!(
                        "No FAQ match for user {} and no credential, using default reply",
                        user_id
                    );
                    DEFAULT_REPLY.to_string()
                }
            },
        };

        // The user must always receive some string once past validation.
        let reply = if reply.is_empty() {
            DEFAULT_REPLY.to_string()
        } else {
            reply
        };

        conversation.push(Message::bot(reply.clone()));

        self.storage.save_conversation(&conversation).map_err(|e| {
            tracing::error!("Failed to persist conversation for user {}: {}", user_id, e);
            e
        })?;

        Ok(reply)
    }

    /// Return the ordered message history for a user
    ///
    /// Unknown users have an empty history; a conversation is only
    /// created by their first message.
    pub fn history(&self, user_id: &str) -> Result<Vec<Message>> {
        Ok(self
            .storage
            .load_conversation(user_id)?
            .map(|conversation| conversation.messages)
            .unwrap_or_default())
    }

    /// Get or create the lock serializing requests for one user
    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
