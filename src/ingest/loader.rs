//! Hybrid record loader: real reviews from a local CSV plus synthetic trap
//! records, combined and deterministically shuffled.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::record::{Record, RecordSource};
use crate::core::config::settings::IngestSettings;

/// Load the batch for one ingestion run. A missing or unreadable dataset
/// file is not an error: the run proceeds with the trap records only.
pub async fn load_hybrid_records(settings: &IngestSettings) -> Vec<Record> {
    let mut records = match tokio::fs::read_to_string(&settings.dataset_path).await {
        Ok(contents) => parse_reviews_csv(&contents, settings.sample_size),
        Err(err) => {
            tracing::warn!(
                "Dataset {} not readable ({}); ingesting synthetic traps only",
                settings.dataset_path.display(),
                err
            );
            Vec::new()
        }
    };

    records.extend(synthetic_traps());

    // Identity is assigned before the shuffle; ids stay joinable to source
    // provenance no matter where the shuffle lands a record.
    for (index, record) in records.iter_mut().enumerate() {
        record.original_index = index;
    }

    let mut rng = StdRng::seed_from_u64(settings.shuffle_seed);
    records.shuffle(&mut rng);

    tracing::info!("Loaded {} records for ingestion", records.len());
    records
}

/// Parse the raw review CSV into uniform records. Source columns are mapped
/// (`name` → title, `reviews.text` → text, `reviews.rating` → rating,
/// `asins` → asin); missing columns fill with placeholders instead of
/// erroring, and rows past `sample_size` are ignored.
fn parse_reviews_csv(contents: &str, sample_size: usize) -> Vec<Record> {
    let mut rows = parse_csv(contents).into_iter();

    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let title_col = find_column(&header, &["name", "title"]);
    let text_col = find_column(&header, &["reviews.text", "text"]);
    let rating_col = find_column(&header, &["reviews.rating", "rating"]);
    let asin_col = find_column(&header, &["asins", "asin"]);

    rows.take(sample_size)
        .map(|row| Record {
            original_index: 0,
            title: cell(&row, title_col).unwrap_or_default(),
            text: cell(&row, text_col).unwrap_or_default(),
            rating: cell(&row, rating_col)
                .and_then(|value| value.parse::<f64>().ok())
                .unwrap_or(0.0) as i64,
            asin: cell(&row, asin_col),
            category: None,
            source: RecordSource::RealLocal,
        })
        .collect()
}

fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| header.iter().position(|col| col == name))
}

fn cell(row: &[String], column: Option<usize>) -> Option<String> {
    let value = row.get(column?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Minimal RFC-4180-style scanner: quoted fields may contain commas,
/// newlines, and doubled quotes.
fn parse_csv(contents: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = contents.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                if row.len() > 1 || !row[0].is_empty() {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Fixture records crafted to trip the semantic judge: PII, a
/// rating/sentiment mismatch, an irrelevant review, gibberish, and an
/// ambiguous borderline case.
pub fn synthetic_traps() -> Vec<Record> {
    let traps = [
        ("Bad", "Refund me! Call 555-0199.", 1, "SYNTH_PII_001"),
        ("Terrible", "Absolute garbage, do not buy.", 5, "SYNTH_DQ_002"),
        ("Coffee?", "The coffee tastes burnt.", 3, "SYNTH_IRR_003"),
        ("???", "asdf jkl;", 1, "SYNTH_GIB_004"),
        ("Battery", "It is okay but the battery died.", 2, "SYNTH_AMB_005"),
    ];

    traps
        .into_iter()
        .map(|(title, text, rating, asin)| Record {
            original_index: 0,
            title: title.to_string(),
            text: text.to_string(),
            rating,
            asin: Some(asin.to_string()),
            category: None,
            source: RecordSource::SyntheticTrap,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings_for(path: PathBuf) -> IngestSettings {
        IngestSettings {
            dataset_path: path,
            ..IngestSettings::default()
        }
    }

    fn write_dataset(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    const SAMPLE_CSV: &str = "name,reviews.text,reviews.rating,asins\n\
        Doorbell,\"Great video, easy setup\",5.0,B00A\n\
        Camera,\"Night vision is blurry, but \"\"fine\"\" overall\",3.0,B00B\n";

    #[test]
    fn quoted_fields_keep_commas_and_escaped_quotes() {
        let rows = parse_csv(SAMPLE_CSV);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], "Great video, easy setup");
        assert_eq!(rows[2][1], "Night vision is blurry, but \"fine\" overall");
    }

    #[test]
    fn quoted_fields_may_span_lines() {
        let rows = parse_csv("a,b\n\"line one\nline two\",x\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "line one\nline two");
    }

    #[test]
    fn header_is_mapped_and_ratings_coerced() {
        let records = parse_reviews_csv(SAMPLE_CSV, 45);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Doorbell");
        assert_eq!(records[0].text, "Great video, easy setup");
        assert_eq!(records[0].rating, 5);
        assert_eq!(records[0].asin.as_deref(), Some("B00A"));
        assert_eq!(records[0].source, RecordSource::RealLocal);
    }

    #[test]
    fn unparsable_rating_coerces_to_zero() {
        let records =
            parse_reviews_csv("name,reviews.text,reviews.rating,asins\nX,ok,five,B1\n", 45);
        assert_eq!(records[0].rating, 0);
    }

    #[test]
    fn missing_columns_fill_with_placeholders() {
        let records = parse_reviews_csv("reviews.text\nWorks fine\n", 45);
        assert_eq!(records[0].title, "");
        assert_eq!(records[0].rating, 0);
        assert_eq!(records[0].asin, None);
    }

    #[test]
    fn rows_past_the_sample_cap_are_ignored() {
        let mut csv = String::from("name,reviews.text,reviews.rating,asins\n");
        for i in 0..50 {
            csv.push_str(&format!("P{i},text {i},4.0,B{i}\n"));
        }
        let records = parse_reviews_csv(&csv, 45);
        assert_eq!(records.len(), 45);
    }

    #[tokio::test]
    async fn missing_file_yields_traps_only() {
        let settings = settings_for(PathBuf::from("/nonexistent/reviews.csv"));
        let records = load_hybrid_records(&settings).await;
        assert_eq!(records.len(), 5);
        assert!(records
            .iter()
            .all(|r| r.source == RecordSource::SyntheticTrap));
    }

    #[tokio::test]
    async fn shuffle_is_deterministic_under_a_fixed_seed() {
        let (_dir, path) = write_dataset(SAMPLE_CSV);

        let first = load_hybrid_records(&settings_for(path.clone())).await;
        let second = load_hybrid_records(&settings_for(path)).await;

        let order = |records: &[Record]| -> Vec<usize> {
            records.iter().map(|r| r.original_index).collect()
        };
        assert_eq!(order(&first), order(&second));
    }

    #[tokio::test]
    async fn original_indices_cover_the_pre_shuffle_batch() {
        let (_dir, path) = write_dataset(SAMPLE_CSV);
        let records = load_hybrid_records(&settings_for(path)).await;

        // 2 real rows + 5 traps, indices 0..7 exactly once each.
        let mut indices: Vec<usize> = records.iter().map(|r| r.original_index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn traps_are_appended_after_real_records() {
        let (_dir, path) = write_dataset(SAMPLE_CSV);
        let records = load_hybrid_records(&settings_for(path)).await;

        // Pre-shuffle positions: real rows get the low indices.
        for record in &records {
            match record.source {
                RecordSource::RealLocal => assert!(record.original_index < 2),
                _ => assert!(record.original_index >= 2),
            }
        }
    }
}
