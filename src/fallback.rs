//! AI fallback client for FaqRelay
//!
//! This module wraps the external generative-text endpoint consulted
//! when no FAQ matches an incoming message. Each call carries the raw
//! message as a single-turn prompt with no prior conversation history,
//! and is never retried. Failures are absorbed into fixed reply texts
//! rather than propagated: once past validation the user always
//! receives some string.

use crate::config::AiConfig;
use crate::error::{Result, RelayError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply used when no FAQ matches and no API credential is configured
pub const DEFAULT_REPLY: &str = "I am not sure how to respond to that.";

/// Reply used when the endpoint answers with an absent or malformed
/// candidate path (a degraded success, not an error)
pub const NO_RESPONSE_REPLY: &str = "Sorry, I could not generate a response.";

/// Reply used when the network call itself fails (timeout, connection
/// error, non-JSON body)
pub const UNAVAILABLE_REPLY: &str = "AI service is unavailable.";

/// Client for the external text-generation endpoint
///
/// Issues one `generateContent` request per fallback invocation. The
/// endpoint base is configurable so tests can point the client at a
/// mock server.
///
/// # Examples
///
/// ```no_run
/// use faqrelay::config::AiConfig;
/// use faqrelay::fallback::FallbackClient;
///
/// # async fn example() -> faqrelay::error::Result<()> {
/// let config = AiConfig {
///     api_key: Some("secret".to_string()),
///     ..Default::default()
/// };
/// let client = FallbackClient::from_config(&config)?.expect("credential configured");
/// let reply = client.generate("tell me a joke").await;
/// # Ok(())
/// # }
/// ```
pub struct FallbackClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

/// Single-turn request payload for the generateContent endpoint
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<PromptContent>,
}

/// One prompt turn
#[derive(Debug, Serialize)]
struct PromptContent {
    role: String,
    parts: Vec<PromptPart>,
}

/// Text part of a prompt turn
#[derive(Debug, Serialize)]
struct PromptPart {
    text: String,
}

/// Response payload from the generateContent endpoint
///
/// Every level defaults so an absent or unexpected shape degrades to
/// "no candidate text" instead of a deserialization error.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// One response candidate
#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

/// Candidate content holding the generated parts
#[derive(Debug, Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

/// Text part of a response candidate
#[derive(Debug, Deserialize, Default)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl FallbackClient {
    /// Create a fallback client from configuration
    ///
    /// Returns `Ok(None)` when no API credential is configured: in that
    /// case the orchestrator must not attempt any network I/O and
    /// substitutes [`DEFAULT_REPLY`] itself.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>> {
        let api_key = match &config.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => {
                tracing::info!("No AI credential configured, fallback client disabled");
                return Ok(None);
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("faqrelay/0.1.0")
            .build()
            .map_err(|e| RelayError::Fallback(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized AI fallback client: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Some(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        }))
    }

    /// Generate a reply for an unmatched user message
    ///
    /// Issues one request carrying the raw message as a single-turn
    /// prompt and extracts the first candidate's first text part. The
    /// three-tier contract:
    ///
    /// - candidate text present: that text;
    /// - response received but candidate path absent, empty, or
    ///   malformed: [`NO_RESPONSE_REPLY`];
    /// - network or decode failure: [`UNAVAILABLE_REPLY`].
    ///
    /// All three are terminal values; nothing is retried.
    pub async fn generate(&self, message: &str) -> String {
        match self.request_completion(message).await {
            Ok(response) => first_candidate_text(response).unwrap_or_else(|| {
                tracing::warn!("AI fallback returned no candidate text");
                NO_RESPONSE_REPLY.to_string()
            }),
            Err(e) => {
                tracing::warn!("AI fallback request failed: {}", e);
                UNAVAILABLE_REPLY.to_string()
            }
        }
    }

    /// Issue the generateContent request and decode the JSON body
    ///
    /// HTTP error statuses are not treated as failures here: the
    /// endpoint reports errors in a JSON body, which decodes to a
    /// response with no candidates and lands in the
    /// [`NO_RESPONSE_REPLY`] tier.
    async fn request_completion(&self, message: &str) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![PromptContent {
                role: "user".to_string(),
                parts: vec![PromptPart {
                    text: message.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RelayError::Fallback(format!("Request failed: {}", e)))?;

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| RelayError::Fallback(format!("Failed to decode response: {}", e)).into())
    }
}

/// Extract the first candidate's first non-empty text part
fn first_candidate_text(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .next()?
        .text
        .filter(|text| !text.is_empty())
}
