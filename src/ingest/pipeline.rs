//! The gatekeeper pipeline.
//!
//! Every record runs judge → embed and terminates as Admitted (index entry)
//! or Quarantined (audit log entry) — exactly one of the two. Records fan
//! out under a bounded-concurrency pool; each record's judge → embed
//! sequence stays strictly sequential, and the index bulk-load happens only
//! after every record has resolved.

use futures_util::stream::{self, StreamExt};
use serde::Serialize;

use super::quarantine::{QuarantineEntry, QuarantineLog};
use super::record::Record;
use crate::core::errors::ApiError;
use crate::index::store::{IndexEntry, VectorIndex};
use crate::llm::CapabilityClient;

/// Block reason for records that passed validation but whose embedding
/// could not be computed; they land in quarantine, never silently dropped.
pub const EMBEDDING_FAILURE_REASON: &str = "Embedding_Failure";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IngestReport {
    pub total: usize,
    pub admitted: usize,
    pub quarantined: usize,
}

enum Resolution {
    Admitted(IndexEntry),
    Quarantined(QuarantineEntry),
}

/// Run one full ingestion: reset the collection, resolve every record,
/// bulk-load the admitted entries in one atomic batch, and return the
/// frozen quarantine log plus a run report.
pub async fn ingest_records(
    records: Vec<Record>,
    capability: &CapabilityClient,
    index: &dyn VectorIndex,
    collection: &str,
    concurrency: usize,
) -> Result<(QuarantineLog, IngestReport), ApiError> {
    index.reset_collection(collection).await?;

    let total = records.len();
    tracing::info!("Starting gated ingestion of {} records", total);

    // `buffered` keeps outcomes in record order, so the quarantine log and
    // the index load order both follow the batch order.
    let resolutions: Vec<Resolution> = stream::iter(records)
        .map(|record| resolve_record(record, capability))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut entries = Vec::new();
    let mut quarantine = QuarantineLog::default();
    for resolution in resolutions {
        match resolution {
            Resolution::Admitted(entry) => entries.push(entry),
            Resolution::Quarantined(entry) => quarantine.push(entry),
        }
    }

    let report = IngestReport {
        total,
        admitted: entries.len(),
        quarantined: quarantine.len(),
    };

    if !entries.is_empty() {
        index.add_batch(collection, entries).await?;
    }

    tracing::info!(
        "Ingestion complete: {} admitted, {} quarantined",
        report.admitted,
        report.quarantined
    );

    Ok((quarantine, report))
}

async fn resolve_record(record: Record, capability: &CapabilityClient) -> Resolution {
    let verdict = capability.judge(&record.text, record.rating).await;

    if !verdict.is_valid() {
        tracing::info!(
            "Blocked record {}: {}",
            record.original_index,
            verdict.reason()
        );
        return Resolution::Quarantined(quarantined(&record, verdict.reason()));
    }

    match capability.try_embed(&record.document()).await {
        Ok(embedding) => Resolution::Admitted(IndexEntry {
            id: record.original_index.to_string(),
            document: record.document(),
            embedding,
            metadata: record.metadata(),
        }),
        Err(err) => {
            tracing::warn!(
                "Embedding failed for record {}: {}",
                record.original_index,
                err
            );
            Resolution::Quarantined(quarantined(&record, EMBEDDING_FAILURE_REASON))
        }
    }
}

fn quarantined(record: &Record, reason: &str) -> QuarantineEntry {
    QuarantineEntry {
        original_index: record.original_index,
        text: record.text.clone(),
        source: record.source,
        block_reason: reason.to_string(),
    }
}
