//! Command-line interface definition for FaqRelay
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for running the relay server and managing the
//! FAQ table.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FaqRelay - customer-support chat relay
///
/// Answers user messages from a curated FAQ table when a match exists,
/// otherwise forwards them to an external AI endpoint, persisting the
/// full conversation per user.
#[derive(Parser, Debug, Clone)]
#[command(name = "faqrelay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the database file path
    #[arg(long, env = "FAQRELAY_DB")]
    pub storage_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for FaqRelay
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP chat relay server
    Serve {
        /// Override the listen address from config
        #[arg(long)]
        host: Option<String>,

        /// Override the listen port from config
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage FAQ records
    Faq {
        /// FAQ management subcommand
        #[command(subcommand)]
        command: FaqCommand,
    },
}

/// FAQ management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FaqCommand {
    /// List stored FAQ records
    List,

    /// Bulk-load FAQ records from a YAML file
    ///
    /// The file holds a sequence of `{question, answer, tags}` entries.
    /// Entries whose question already exists are reported and skipped.
    Import {
        /// Path to the YAML file
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
