pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Gemini API key is missing or blank")]
    MissingApiKey,

    #[error("Gemini request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gemini API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Token accounting reported by the service. Diagnostic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
    #[serde(default)]
    pub total_token_count: u64,
}

/// Text produced for a prompt, plus usage if the service sent any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResult {
    pub text: String,
    pub usage: Option<UsageMetadata>,
}

/// A text-completion service.
///
/// A blank request must return an empty result without contacting the
/// service. Service failures are returned, never swallowed.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &str) -> Result<CompletionResult, AiError>;
}
