//! AI invocation orchestrator
//!
//! Tries the Gemini API and degrades to the offline synthesizer instead of
//! ever surfacing a failure. The policy is deliberately shallow: one
//! credential, at most one alternate-model retry, then degrade. That keeps
//! the user's worst-case wait bounded at two timeouts instead of walking
//! the whole key pool.

use crate::ai::fallback;
use crate::ai::gemini::{GenerativeBackend, ImageData};
use crate::ai::keys::ApiKeyPool;
use crate::ai::prompt::build_prompt;
use crate::models::FishSpecies;

pub const PRIMARY_MODEL: &str = "gemini-2.0-flash";
pub const ALTERNATE_MODEL: &str = "gemini-2.5-flash";

pub struct ChatOrchestrator<B: GenerativeBackend> {
    backend: B,
}

impl<B: GenerativeBackend> ChatOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Produce an answer for the question. Always returns non-empty text;
    /// every external failure mode ends in the synthesizer.
    pub async fn answer(
        &self,
        question: &str,
        image: Option<&ImageData>,
        records: &[FishSpecies],
        keys: &ApiKeyPool,
    ) -> String {
        let Some(api_key) = keys.first_key() else {
            log::info!("[AI] No API keys configured, using offline synthesizer");
            return fallback::synthesize(question, records);
        };

        let prompt = build_prompt(question, records);

        match self.backend.generate(api_key, PRIMARY_MODEL, &prompt, image).await {
            Ok(text) => return text,
            Err(err) if err.allows_model_retry() => {
                log::warn!(
                    "[AI] Model {} failed ({}), retrying once with {}",
                    PRIMARY_MODEL,
                    err,
                    ALTERNATE_MODEL
                );
                match self
                    .backend
                    .generate(api_key, ALTERNATE_MODEL, &prompt, image)
                    .await
                {
                    Ok(text) => return text,
                    Err(err) => {
                        log::warn!("[AI] Alternate model {} failed: {}", ALTERNATE_MODEL, err);
                    }
                }
            }
            Err(err) if err.is_quota_exhausted() => {
                // No quota-aware waiting: degrade immediately to keep
                // latency bounded.
                log::warn!("[AI] Quota exhausted, degrading: {}", err);
            }
            Err(err) => {
                log::warn!("[AI] Gemini call failed, degrading: {}", err);
            }
        }

        fallback::synthesize(question, records)
    }
}
