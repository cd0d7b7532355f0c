//! Serve command handler
//!
//! Wires storage, the conversation service, and the optional AI
//! fallback client into the router and runs the HTTP listener.

use crate::config::Config;
use crate::error::Result;
use crate::fallback::FallbackClient;
use crate::server::{build_router, AppState};
use crate::service::ChatService;
use anyhow::Context;
use std::sync::Arc;

/// Run the chat relay HTTP server until interrupted
pub async fn run_serve(config: Config) -> Result<()> {
    let storage = Arc::new(super::open_storage(&config)?);
    let fallback = FallbackClient::from_config(&config.ai)?;
    let service = Arc::new(ChatService::new(storage.clone(), fallback));

    let app = build_router(AppState { service, storage });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Relay listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
