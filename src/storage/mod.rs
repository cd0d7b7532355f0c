use crate::error::{Result, RelayError};
use anyhow::Context;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

pub mod types;
pub use types::{Conversation, Faq, Message, Sender};

/// Storage backend for conversations and FAQ records
///
/// One durable collection of [`Conversation`] records (unique key
/// `user_id`) and one of [`Faq`] records (unique key `question`).
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Create a new storage instance
    ///
    /// Initializes the database file in the user's data directory.
    pub fn new() -> Result<Self> {
        // Allow override of the relay DB path via environment variable.
        // This makes it easy to point the binary at a test DB or alternate
        // file without changing the user's application data dir.
        if let Ok(override_path) = std::env::var("FAQRELAY_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "xbcsmith", "faqrelay")
            .ok_or_else(|| RelayError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let db_path = data_dir.join("relay.db");
        let storage = Self { db_path };

        storage.init()?;

        Ok(storage)
    }

    /// Create a new storage instance that uses the specified database path.
    ///
    /// This is primarily useful for tests where the default application data
    /// directory is not desirable (for example, using a temporary directory).
    ///
    /// # Examples
    ///
    /// ```
    /// use faqrelay::storage::SqliteStorage;
    ///
    /// let storage = SqliteStorage::new_with_path("/tmp/test_relay.db").unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        // Ensure parent directory exists so opening the DB file succeeds.
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| RelayError::Storage(e.to_string()))?;
        }

        let storage = Self { db_path };
        storage.init()?;
        Ok(storage)
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS conversations (
                user_id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                messages JSON NOT NULL
            )",
            [],
        )
        .context("Failed to create conversations table")
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS faqs (
                question TEXT PRIMARY KEY,
                answer TEXT NOT NULL,
                tags JSON NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create faqs table")
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(())
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| RelayError::Storage(e.to_string()).into())
    }

    /// Save or update a conversation (create-or-update keyed by user_id)
    ///
    /// The stored `created_at` is preserved on update; `updated_at` and
    /// the message sequence are taken from the passed conversation.
    pub fn save_conversation(&self, conversation: &Conversation) -> Result<()> {
        let mut conn = self.open()?;

        let messages_json = serde_json::to_string(&conversation.messages)
            .context("Failed to serialize messages")
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        // Check if exists to preserve created_at
        let exists: bool = tx
            .query_row(
                "SELECT 1 FROM conversations WHERE user_id = ?",
                params![conversation.user_id],
                |_| Ok(true),
            )
            .optional()
            .unwrap_or(Some(false))
            .unwrap_or(false);

        if exists {
            tx.execute(
                "UPDATE conversations SET
                    updated_at = ?,
                    messages = ?
                WHERE user_id = ?",
                params![
                    conversation.updated_at.to_rfc3339(),
                    messages_json,
                    conversation.user_id
                ],
            )
            .context("Failed to update conversation")
            .map_err(|e| RelayError::Storage(e.to_string()))?;
        } else {
            tx.execute(
                "INSERT INTO conversations (user_id, created_at, updated_at, messages)
                VALUES (?, ?, ?, ?)",
                params![
                    conversation.user_id,
                    conversation.created_at.to_rfc3339(),
                    conversation.updated_at.to_rfc3339(),
                    messages_json
                ],
            )
            .context("Failed to insert conversation")
            .map_err(|e| RelayError::Storage(e.to_string()))?;
        }

        tx.commit()
            .context("Failed to commit transaction")
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Load a conversation by user_id
    pub fn load_conversation(&self, user_id: &str) -> Result<Option<Conversation>> {
        let conn = self.open()?;

        let result = conn
            .query_row(
                "SELECT created_at, updated_at, messages FROM conversations WHERE user_id = ?",
                params![user_id],
                |row| {
                    let created_at: String = row.get(0)?;
                    let updated_at: String = row.get(1)?;
                    let messages_json: String = row.get(2)?;
                    Ok((created_at, updated_at, messages_json))
                },
            )
            .optional()
            .context("Failed to query conversation")
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        match result {
            Some((created_at, updated_at, messages_json)) => {
                let messages: Vec<Message> = serde_json::from_str(&messages_json)
                    .context("Failed to deserialize messages")
                    .map_err(|e| RelayError::Storage(e.to_string()))?;
                Ok(Some(Conversation {
                    user_id: user_id.to_string(),
                    messages,
                    created_at: parse_timestamp(&created_at),
                    updated_at: parse_timestamp(&updated_at),
                }))
            }
            None => Ok(None),
        }
    }

    /// Insert a new FAQ record
    ///
    /// Question uniqueness is enforced here: inserting a duplicate
    /// question fails with [`RelayError::DuplicateFaq`] and leaves the
    /// store unchanged, never silently overwrites.
    pub fn insert_faq(&self, faq: &Faq) -> Result<()> {
        let conn = self.open()?;

        let tags_json = serde_json::to_string(&faq.tags)
            .context("Failed to serialize tags")
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let inserted = conn.execute(
            "INSERT INTO faqs (question, answer, tags, created_at)
            VALUES (?, ?, ?, ?)",
            params![
                faq.question,
                faq.answer,
                tags_json,
                faq.created_at.to_rfc3339()
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(RelayError::DuplicateFaq(faq.question.clone()).into())
            }
            Err(e) => Err(RelayError::Storage(format!("Failed to insert FAQ: {}", e)).into()),
        }
    }

    /// List all FAQ records in insertion order
    ///
    /// Insertion order is the resolution pipeline's iteration order, so
    /// the earliest-uploaded matching FAQ wins ties.
    pub fn list_faqs(&self) -> Result<Vec<Faq>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare("SELECT question, answer, tags, created_at FROM faqs ORDER BY rowid")
            .context("Failed to prepare statement")
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let faqs_iter = stmt
            .query_map([], |row| {
                let question: String = row.get(0)?;
                let answer: String = row.get(1)?;
                let tags_json: String = row.get(2)?;
                let created_at_str: String = row.get(3)?;

                let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_default();

                Ok(Faq {
                    question,
                    answer,
                    tags,
                    created_at: parse_timestamp(&created_at_str),
                })
            })
            .context("Failed to query FAQs")
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let mut faqs = Vec::new();
        for faq in faqs_iter.flatten() {
            faqs.push(faq);
        }

        Ok(faqs)
    }
}

/// Parse a stored RFC3339 timestamp, falling back to now on corruption
fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
