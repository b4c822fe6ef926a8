//! Fingerprint keys for cross-source matching
//!
//! `<title prefix>|<first author surname>|<year>` approximates "same
//! underlying work" across sources that lack a shared DOI. Collisions
//! between genuinely distinct works with coinciding title/author/year
//! are an accepted false-merge risk.

use super::normalization::normalize_text;
use crate::domain::RawRecord;

/// Minimum character count for a fingerprint to participate in
/// matching. Anything shorter carries too little signal and would
/// mass-merge blank-titled records.
const MIN_MATCHABLE_CHARS: usize = 11;

/// Build the matching key from normalized title, first author, and year
pub fn fingerprint(record: &RawRecord) -> String {
    let title = normalize_text(record.title.as_deref().unwrap_or(""));
    let title_prefix: String = title.chars().take(50).collect();

    let first_author = record
        .authors
        .as_deref()
        .map(first_author_key)
        .unwrap_or_default();

    let year: String = record
        .year
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(4)
        .collect();

    format!("{}|{}|{}", title_prefix, first_author, year)
}

/// Whether a fingerprint carries enough signal to match against
pub fn is_matchable(fp: &str) -> bool {
    fp.chars().count() >= MIN_MATCHABLE_CHARS
}

/// Surname-ish key for the first listed author: the segment before the
/// first `;`, then before the first `,`, lowercased, word chars only.
/// Empty if there are no authors.
fn first_author_key(authors: &str) -> String {
    let first = authors.split(';').next().unwrap_or("");
    let surname = first.split(',').next().unwrap_or("");
    surname
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}
