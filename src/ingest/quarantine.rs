use serde::Serialize;

use super::record::RecordSource;

/// One blocked record in the audit log. Mutually exclusive with an index
/// entry for the same record.
#[derive(Debug, Clone, Serialize)]
pub struct QuarantineEntry {
    pub original_index: usize,
    pub text: String,
    pub source: RecordSource,
    pub block_reason: String,
}

/// Ordered audit log of one ingestion run's blocked records. Append-only
/// while the run executes, frozen (shared behind `Arc`) afterwards.
#[derive(Debug, Default, Serialize)]
pub struct QuarantineLog {
    entries: Vec<QuarantineEntry>,
}

impl QuarantineLog {
    pub fn push(&mut self, entry: QuarantineEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[QuarantineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
