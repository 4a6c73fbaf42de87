use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{AiError, CompletionProvider, CompletionResult, UsageMetadata};

pub const DEFAULT_GEMINI_API: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    /// Create a client for `model`. Fails right away on an empty or
    /// whitespace-only key; nothing is sent over the network here.
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, AiError> {
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.into(),
            api_base: api_base.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    #[instrument(skip_all, fields(request_bytes = request.len()))]
    async fn complete(&self, request: &str) -> Result<CompletionResult, AiError> {
        if request.trim().is_empty() {
            debug!("blank request, skipping Gemini call");
            return Ok(CompletionResult::default());
        }

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": request }] }],
        });

        debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, body });
        }

        let parsed = response.json::<GenerateContentResponse>().await?;
        if let Some(usage) = &parsed.usage_metadata {
            info!(
                prompt_tokens = usage.prompt_token_count,
                response_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "Gemini usage"
            );
        }

        Ok(CompletionResult {
            text: parsed.text(),
            usage: parsed.usage_metadata,
        })
    }
}
