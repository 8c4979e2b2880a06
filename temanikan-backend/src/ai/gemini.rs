//! Gemini API client
//!
//! Thin HTTP wrapper around the `generateContent` endpoint. Failures are
//! classified so the orchestrator can decide between an alternate-model
//! retry and degrading to the offline synthesizer.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Per-attempt timeout. Two attempts maximum, so worst-case external
/// latency stays bounded at roughly twice this value.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Base64 image payload forwarded to the model as an `inline_data` part.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeminiError {
    /// The service answered with a non-success HTTP status.
    Status { code: u16, body: String },
    /// Transport-level failure (connect, timeout, DNS).
    Network(String),
    /// HTTP success but no usable answer text in the payload.
    EmptyAnswer,
}

impl GeminiError {
    /// 403 (rejected credential) and 404 (unknown model) get one retry with
    /// the alternate model on the same key. Everything else degrades.
    pub fn allows_model_retry(&self) -> bool {
        matches!(self, GeminiError::Status { code: 403 | 404, .. })
    }

    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, GeminiError::Status { code: 429, .. })
    }
}

impl std::fmt::Display for GeminiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeminiError::Status { code, body } => {
                write!(f, "Gemini API returned status {}: {}", code, body)
            }
            GeminiError::Network(msg) => write!(f, "Gemini API request failed: {}", msg),
            GeminiError::EmptyAnswer => write!(f, "Gemini API returned no answer text"),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Seam between the orchestrator and the external service, so tests can
/// substitute a scripted backend.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        image: Option<&ImageData>,
    ) -> Result<String, GeminiError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new() -> Result<Self, String> {
        Self::with_base_url(GEMINI_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        image: Option<&ImageData>,
    ) -> Result<String, GeminiError> {
        let url = format!("{}/{}:generateContent", self.base_url, model);

        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];
        if let Some(img) = image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: img.mime_type.clone(),
                    data: img.data.clone(),
                },
            });
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        log::info!("[GEMINI] Sending request to model {}", model);

        let response = self
            .client
            .post(&url)
            .header("X-goog-api-key", api_key.trim())
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "[GEMINI] Model {} returned status {}: {}",
                model,
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            );
            return Err(GeminiError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GeminiError::Network(format!("Failed to parse response: {}", e)))?;

        let text = extract_answer_text(&payload);
        if text.trim().is_empty() {
            return Err(GeminiError::EmptyAnswer);
        }

        log::info!("[GEMINI] Model {} answered ({} chars)", model, text.len());
        Ok(text)
    }
}

/// Pull the answer out of `candidates[0].content.parts[0].text`.
///
/// The payload shape is nested and every level is optional; this is the one
/// place that knows about it. Anything missing collapses to an empty string.
pub fn extract_answer_text(payload: &Value) -> String {
    payload
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string()
}
