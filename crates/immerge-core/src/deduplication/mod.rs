//! Cross-source duplicate removal
//!
//! Field normalization, fingerprint keys, and the completeness-ordered
//! dedup pass over accumulated records.

mod fingerprint;
mod normalization;
mod orchestration;

pub use fingerprint::{fingerprint, is_matchable};
pub(crate) use normalization::extract_year;
pub use normalization::{normalize_doi, normalize_text};
pub use orchestration::{
    completeness_score, deduplicate, DedupMethod, DedupOutcome, DedupState, RemovedRecord,
};
