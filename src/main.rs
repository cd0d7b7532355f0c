//! FaqRelay - customer-support chat relay
//!
//! Main entry point for the relay application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use faqrelay::cli::{Cli, Commands};
use faqrelay::commands;
use faqrelay::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // If the user supplied a storage path on the CLI (or via env),
    // mirror it into FAQRELAY_DB so the storage initializer can pick it up.
    if let Some(db_path) = &cli.storage_path {
        std::env::set_var("FAQRELAY_DB", db_path);
        tracing::info!("Using storage DB override from CLI: {}", db_path);
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting chat relay server");
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Faq { command } => {
            commands::faq::run_faq(config, command).await?;
            Ok(())
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("faqrelay=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
