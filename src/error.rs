//! Error types for FaqRelay
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for FaqRelay operations
///
/// This enum encompasses all possible errors that can occur while
/// handling chat requests, loading configuration, talking to the AI
/// fallback endpoint, and persisting conversations and FAQs.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request validation errors (missing userId or message)
    #[error("Validation error: {0}")]
    Validation(String),

    /// FAQ unique-constraint violation on upload
    #[error("Duplicate FAQ question: {0}")]
    DuplicateFaq(String),

    /// AI fallback errors (network or payload failures)
    ///
    /// These never surface to an end user as a hard failure; the
    /// fallback client absorbs them into a fixed reply text. The
    /// variant exists for internal propagation and logging.
    #[error("Fallback error: {0}")]
    Fallback(String),

    /// Conversation and FAQ storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for FaqRelay operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
