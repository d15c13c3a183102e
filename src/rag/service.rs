use std::sync::Arc;

use serde::Serialize;

use super::prompt::grounding_prompt;
use crate::core::errors::ApiError;
use crate::index::store::{SearchHit, VectorIndex};
use crate::llm::{CapabilityClient, GENERATION_ERROR_SENTINEL};

/// Result of one query. Retrieval and generation fail independently: zero
/// matches short-circuits generation, and a generation failure is surfaced
/// as `degraded` — context found, but no real answer — never folded into a
/// silent success.
#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    pub matches: Vec<SearchHit>,
    pub answer: Option<String>,
    pub degraded: bool,
}

/// Serves natural-language queries against the frozen index.
#[derive(Clone)]
pub struct AnswerService {
    capability: Arc<CapabilityClient>,
    index: Arc<dyn VectorIndex>,
    collection: String,
    top_k: usize,
}

impl AnswerService {
    pub fn new(
        capability: Arc<CapabilityClient>,
        index: Arc<dyn VectorIndex>,
        collection: String,
        top_k: usize,
    ) -> Self {
        Self {
            capability,
            index,
            collection,
            top_k,
        }
    }

    pub async fn answer(&self, query: &str) -> Result<QueryOutcome, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::BadRequest("Query must not be empty".to_string()));
        }

        // Embedding failure degrades to a zero vector rather than aborting
        // the query; only a store failure is a retrieval-stage error.
        let embedding = self.capability.embed_or_zero(query).await;

        let matches = self
            .index
            .search(&self.collection, &embedding, self.top_k)
            .await
            .map_err(|err| ApiError::Retrieval(err.to_string()))?;

        if matches.is_empty() {
            tracing::info!("No relevant documents for query");
            return Ok(QueryOutcome {
                matches,
                answer: None,
                degraded: false,
            });
        }

        let prompt = grounding_prompt(query, &matches);
        let answer = self.capability.generate(&prompt).await;
        let degraded = answer == GENERATION_ERROR_SENTINEL;
        if degraded {
            tracing::warn!("Generation degraded to sentinel for query");
        }

        Ok(QueryOutcome {
            matches,
            answer: Some(answer),
            degraded,
        })
    }
}
