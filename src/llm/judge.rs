//! Semantic quality judge: verdict type, prompt, and fail-closed parsing.

use serde::Deserialize;

/// Reason reported when the judge's output could not be parsed.
pub const PARSE_ERROR_REASON: &str = "AI_Parsing_Error";

/// Outcome of judging one record. A judgment that cannot be parsed is its
/// own variant rather than an implicit pass or an error — the gate treats it
/// as a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid { reason: String },
    Invalid { reason: String },
    ParseError,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            Verdict::Valid { reason } | Verdict::Invalid { reason } => reason,
            Verdict::ParseError => PARSE_ERROR_REASON,
        }
    }

    /// Parse a raw generator response. Generators routinely wrap the JSON in
    /// prose, so the substring between the first `{` and the last `}` is
    /// extracted before parsing. Anything unparsable fails closed.
    pub fn from_raw(raw: &str) -> Verdict {
        let Some(json_str) = extract_json_object(raw) else {
            return Verdict::ParseError;
        };

        match serde_json::from_str::<RawVerdict>(json_str) {
            Ok(RawVerdict { is_valid: true, reason }) => Verdict::Valid { reason },
            Ok(RawVerdict { is_valid: false, reason }) => Verdict::Invalid { reason },
            Err(_) => Verdict::ParseError,
        }
    }
}

#[derive(Deserialize)]
struct RawVerdict {
    is_valid: bool,
    reason: String,
}

/// Prompt instructing the generator to emit a strict two-field JSON verdict.
pub fn judgment_prompt(text: &str, rating: i64) -> String {
    format!(
        r#"You are a data quality reviewer. Analyze this record.

DATA:
Review: "{text}"
Rating: {rating}

RULES:
1. PII: Phone numbers or emails?
2. Mismatch: Negative text but a high rating?
3. Bad Data: Gibberish or incoherent text?

OUTPUT format must be strictly JSON:
{{
    "is_valid": true or false,
    "reason": "Clean" or "PII Detected" or "Sentiment Mismatch"
}}

JSON:"#
    )
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
