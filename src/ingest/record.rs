use serde::{Deserialize, Serialize};

use crate::index::store::DocumentMetadata;

/// Provenance of a record within the hybrid batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordSource {
    #[serde(rename = "Real_Local")]
    RealLocal,
    #[serde(rename = "Synthetic_Trap")]
    SyntheticTrap,
    Unknown,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::RealLocal => "Real_Local",
            RecordSource::SyntheticTrap => "Synthetic_Trap",
            RecordSource::Unknown => "Unknown",
        }
    }
}

/// One raw review in the uniform schema. Immutable once loaded;
/// `original_index` is assigned by position in the pre-shuffle batch and is
/// the stable join key back to source provenance.
#[derive(Debug, Clone)]
pub struct Record {
    pub original_index: usize,
    pub title: String,
    pub text: String,
    pub rating: i64,
    pub asin: Option<String>,
    pub category: Option<String>,
    pub source: RecordSource,
}

impl Record {
    /// The document string that gets embedded and indexed.
    pub fn document(&self) -> String {
        format!("Title: {}\nReview: {}", self.title, self.text)
    }

    /// Index metadata with missing fields coerced to sentinel strings; the
    /// index schema forbids absent values.
    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            rating: self.rating,
            category: self
                .category
                .clone()
                .unwrap_or_else(|| "General".to_string()),
            source: self.source.as_str().to_string(),
            asin: self.asin.clone().unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            original_index: 3,
            title: "Battery".to_string(),
            text: "It is okay but the battery died.".to_string(),
            rating: 2,
            asin: None,
            category: None,
            source: RecordSource::SyntheticTrap,
        }
    }

    #[test]
    fn document_concatenates_title_and_text() {
        assert_eq!(
            record().document(),
            "Title: Battery\nReview: It is okay but the battery died."
        );
    }

    #[test]
    fn metadata_coerces_missing_fields_to_sentinels() {
        let meta = record().metadata();
        assert_eq!(meta.rating, 2);
        assert_eq!(meta.category, "General");
        assert_eq!(meta.asin, "N/A");
        assert_eq!(meta.source, "Synthetic_Trap");
    }

    #[test]
    fn source_serializes_with_stable_strings() {
        assert_eq!(
            serde_json::to_string(&RecordSource::RealLocal).unwrap(),
            "\"Real_Local\""
        );
        assert_eq!(
            serde_json::to_string(&RecordSource::SyntheticTrap).unwrap(),
            "\"Synthetic_Trap\""
        );
    }
}
