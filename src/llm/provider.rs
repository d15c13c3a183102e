use async_trait::async_trait;

use super::types::GenerationRequest;
use crate::core::errors::ApiError;

/// Boundary to the external language/embedding service. Implementations
/// return raw provider errors; the fallback policy lives in
/// [`super::capability::CapabilityClient`].
#[async_trait]
pub trait LanguageProvider: Send + Sync {
    /// provider name (e.g. "openai-compat")
    fn name(&self) -> &str;

    /// check if the provider is healthy/reachable
    async fn health_check(&self) -> Result<bool, ApiError>;

    /// text completion (non-streaming)
    async fn generate(&self, request: GenerationRequest) -> Result<String, ApiError>;

    /// generate embeddings, one vector per input
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;
}
