//! FaqRelay - customer-support chat relay library
//!
//! This library provides the core functionality for the FaqRelay
//! service: the message-resolution pipeline, conversation
//! orchestration, persistence, the AI fallback client, and the HTTP
//! surface.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `resolve`: pure decision logic choosing between a FAQ answer and
//!   the AI fallback
//! - `service`: conversation orchestration (the only writer of
//!   conversation state)
//! - `fallback`: client for the external text-generation endpoint
//! - `storage`: SQLite-backed conversation and FAQ stores
//! - `server`: axum route wiring and JSON shapes
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use faqrelay::fallback::FallbackClient;
//! use faqrelay::service::ChatService;
//! use faqrelay::storage::SqliteStorage;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let storage = Arc::new(SqliteStorage::new()?);
//! let service = ChatService::new(storage, None);
//! let reply = service.handle_message("user-1", "what are your operating hours?").await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fallback;
pub mod resolve;
pub mod server;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{RelayError, Result};
pub use resolve::{resolve, ReplyOutcome};
pub use service::ChatService;
