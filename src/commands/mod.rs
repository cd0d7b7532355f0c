//! Command handlers for FaqRelay
//!
//! Each CLI subcommand has a handler module here; `main.rs` dispatches
//! to them after configuration is loaded and validated.

pub mod faq;
pub mod serve;

use crate::config::Config;
use crate::error::Result;
use crate::storage::SqliteStorage;

/// Open the store configured for this run
///
/// A configured `storage.db_path` takes effect here; otherwise the
/// platform data directory (or the `FAQRELAY_DB` override) is used.
pub(crate) fn open_storage(config: &Config) -> Result<SqliteStorage> {
    match &config.storage.db_path {
        Some(db_path) => SqliteStorage::new_with_path(db_path),
        None => SqliteStorage::new(),
    }
}
