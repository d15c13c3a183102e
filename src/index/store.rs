//! VectorIndex trait — abstract interface over the similarity store.
//!
//! Populated once per ingestion run (full rebuild, no append), queried many
//! times after. Implementations must support concurrent reads once frozen.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

/// Metadata stored alongside each admitted document. Every field is a
/// non-null scalar; missing source fields are coerced to sentinel strings
/// before an entry is built, since the index schema forbids absent values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub rating: i64,
    pub category: String,
    pub source: String,
    pub asin: String,
}

/// One admitted record, ready for bulk load. Exists iff the record passed
/// validation and its embedding was computed.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Stringified pre-shuffle index of the source record; the join key back
    /// to provenance, unique and stable for the run.
    pub id: String,
    pub document: String,
    pub embedding: Vec<f32>,
    pub metadata: DocumentMetadata,
}

/// Result of a similarity search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub document: String,
    pub metadata: DocumentMetadata,
    /// Cosine similarity (higher = better).
    pub score: f32,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the named collection, deleting any prior contents first. The
    /// pipeline has full-rebuild semantics only.
    async fn reset_collection(&self, collection: &str) -> Result<(), ApiError>;

    /// Load entries into the collection in one atomic batch.
    async fn add_batch(&self, collection: &str, entries: Vec<IndexEntry>)
        -> Result<(), ApiError>;

    /// Nearest-neighbor search, best-first, up to `k` hits (fewer when the
    /// collection holds fewer entries).
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<SearchHit>, ApiError>;

    async fn count(&self, collection: &str) -> Result<usize, ApiError>;
}
