use std::sync::Arc;

use super::judge::{judgment_prompt, Verdict};
use super::provider::LanguageProvider;
use super::types::GenerationRequest;
use crate::core::errors::ApiError;

/// Fixed string returned in place of an answer when generation fails.
/// Callers that care must treat it distinctly from a real answer.
pub const GENERATION_ERROR_SENTINEL: &str = "Error generating text.";

/// Wraps the raw provider with the degradation policy: embedding failures
/// must not abort an ingestion batch or a query, and an unparseable judgment
/// must never be treated as a pass.
#[derive(Clone)]
pub struct CapabilityClient {
    provider: Arc<dyn LanguageProvider>,
    embedding_dimension: usize,
    max_tokens: i32,
}

impl CapabilityClient {
    pub fn new(
        provider: Arc<dyn LanguageProvider>,
        embedding_dimension: usize,
        max_tokens: i32,
    ) -> Self {
        Self {
            provider,
            embedding_dimension,
            max_tokens,
        }
    }

    pub fn embedding_dimension(&self) -> usize {
        self.embedding_dimension
    }

    /// Embed with the provider error propagated raw. The ingestion admit
    /// path uses this so a failed embedding can be routed to quarantine.
    pub async fn try_embed(&self, text: &str) -> Result<Vec<f32>, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "Cannot embed empty text".to_string(),
            ));
        }

        let mut vectors = self.provider.embed(&[text.to_string()]).await?;
        if vectors.is_empty() {
            return Err(ApiError::Internal(
                "Provider returned no embedding".to_string(),
            ));
        }
        Ok(vectors.swap_remove(0))
    }

    /// Embed with zero-vector degradation. A zero vector sorts last under
    /// cosine ranking, so the failure stays harmless to retrieval quality.
    pub async fn embed_or_zero(&self, text: &str) -> Vec<f32> {
        match self.try_embed(text).await {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!("Embedding failed, degrading to zero vector: {}", err);
                vec![0.0; self.embedding_dimension]
            }
        }
    }

    /// Deterministic (temperature 0) generation; returns the fixed sentinel
    /// instead of an error on failure.
    pub async fn generate(&self, prompt: &str) -> String {
        let request =
            GenerationRequest::deterministic(prompt).with_max_tokens(self.max_tokens);

        match self.provider.generate(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Generation failed: {}", err);
                GENERATION_ERROR_SENTINEL.to_string()
            }
        }
    }

    /// Run the semantic quality judge over one record. Provider failures
    /// surface as the sentinel, which never parses, so the verdict fails
    /// closed either way.
    pub async fn judge(&self, text: &str, rating: i64) -> Verdict {
        let prompt = judgment_prompt(text, rating);
        let raw = self.generate(&prompt).await;
        tracing::debug!("Judge output: {}", raw);
        Verdict::from_raw(&raw)
    }
}
