//! Grounding prompt assembly.
//!
//! The generation prompt carries the retrieved reviews with their
//! source/rating metadata and an explicit instruction to answer only from
//! that context.

use crate::index::store::SearchHit;

/// Format retrieved hits into the context block, one numbered review per
/// hit, best match first.
pub fn format_context(hits: &[SearchHit]) -> String {
    let mut context = String::new();
    for (idx, hit) in hits.iter().enumerate() {
        context.push_str(&format!(
            "REVIEW {} (Source: {}, Rating: {}):\n{}\n\n",
            idx + 1,
            hit.metadata.source,
            hit.metadata.rating,
            hit.document
        ));
    }
    context
}

/// Build the full grounding prompt for one query.
pub fn grounding_prompt(query: &str, hits: &[SearchHit]) -> String {
    format!(
        "You are a helpful customer support agent analyzing product feedback.\n\
         USER QUESTION: \"{}\"\n\
         RETRIEVED REVIEWS:\n\
         {}\
         Based ONLY on the reviews above, answer the user.",
        query,
        format_context(hits)
    )
}
