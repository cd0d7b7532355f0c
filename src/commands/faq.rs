//! FAQ command handlers
//!
//! Admin tooling for the FAQ table: listing the stored records and
//! bulk-importing entries from a YAML file. Imports go through the
//! same duplicate-rejecting insert path as the upload endpoint;
//! duplicates are reported and skipped rather than aborting the run.

use crate::cli::FaqCommand;
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::storage::Faq;
use serde::Deserialize;
use std::path::Path;

/// One entry of a FAQ import file
#[derive(Debug, Deserialize)]
struct FaqImportEntry {
    question: String,
    answer: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Run a FAQ management subcommand
pub async fn run_faq(config: Config, command: FaqCommand) -> Result<()> {
    let storage = super::open_storage(&config)?;

    match command {
        FaqCommand::List => {
            let faqs = storage.list_faqs()?;
            if faqs.is_empty() {
                println!("No FAQ records stored.");
                return Ok(());
            }
            for faq in faqs {
                println!("{} -> {} [{}]", faq.question, faq.answer, faq.tags.join(", "));
            }
            Ok(())
        }
        FaqCommand::Import { file } => import_faqs(&storage, &file),
    }
}

fn import_faqs(storage: &crate::storage::SqliteStorage, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .map_err(|e| RelayError::Config(format!("Failed to read FAQ file: {}", e)))?;
    let entries: Vec<FaqImportEntry> = serde_yaml::from_str(&contents)
        .map_err(|e| RelayError::Config(format!("Failed to parse FAQ file: {}", e)))?;

    let mut imported = 0usize;
    let mut skipped = 0usize;

    for entry in entries {
        let faq = Faq::new(entry.question, entry.answer, entry.tags);
        match storage.insert_faq(&faq) {
            Ok(()) => imported += 1,
            Err(e) if matches!(e.downcast_ref::<RelayError>(), Some(RelayError::DuplicateFaq(_))) =>
            {
                tracing::warn!("Skipping duplicate FAQ question: {}", faq.question);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    println!("Imported {} FAQ records ({} duplicates skipped).", imported, skipped);
    Ok(())
}
