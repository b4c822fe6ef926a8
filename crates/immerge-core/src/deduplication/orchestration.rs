//! The dedup pass: completeness ordering plus exact-key matching

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fingerprint::{fingerprint, is_matchable};
use super::normalization::normalize_doi;
use crate::domain::RawRecord;
use crate::sources::SourceDatabase;

/// How a duplicate was identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DedupMethod {
    Doi,
    Fingerprint,
}

/// Provenance of one removed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedRecord {
    pub method: DedupMethod,
    pub source_db: SourceDatabase,
}

/// Statistics from one dedup pass. Reporting only; the surviving set
/// does not depend on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DedupOutcome {
    pub duplicates_by_doi: usize,
    pub duplicates_by_fingerprint: usize,
    pub removed: Vec<RemovedRecord>,
}

impl DedupOutcome {
    pub fn total_duplicates(&self) -> usize {
        self.duplicates_by_doi + self.duplicates_by_fingerprint
    }
}

/// Growing match state for a dedup pass.
///
/// Explicit rather than function-local so the algorithm can be tested
/// in isolation. Single-writer: one pass walks the sorted records and
/// mutates these sets; the state must never be shared across
/// partitions.
#[derive(Debug, Default)]
pub struct DedupState {
    seen_dois: HashSet<String>,
    seen_fingerprints: HashSet<String>,
}

impl DedupState {
    /// Register a normalized DOI. Returns true if it was already seen.
    /// Comparison is case-insensitive.
    pub fn check_doi(&mut self, normalized_doi: &str) -> bool {
        !self.seen_dois.insert(normalized_doi.to_lowercase())
    }

    /// Register a fingerprint. Returns true if it was already seen.
    pub fn check_fingerprint(&mut self, fp: String) -> bool {
        !self.seen_fingerprints.insert(fp)
    }
}

/// Completeness score: non-empty canonical field count, weighted toward
/// records carrying a DOI, PMID, or abstract.
pub fn completeness_score(record: &RawRecord) -> u32 {
    let mut score = record.field_count() as u32;
    if has(&record.doi) {
        score += 10;
    }
    if has(&record.pmid) {
        score += 5;
    }
    if has(&record.abstract_text) {
        score += 5;
    }
    score
}

fn has(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Remove duplicates by normalized DOI, then by fingerprint.
///
/// Records are walked in completeness order (most complete first,
/// ingestion sequence as tie-break), so the richest copy of each work
/// survives, and among equally complete copies the first-ingested one
/// is kept. Records with neither a usable DOI nor a matchable
/// fingerprint are always kept: absence of signal must never collapse
/// records.
///
/// Survivor order is the completeness-sorted order, not ingestion
/// order. Deterministic for a given input.
pub fn deduplicate(mut records: Vec<RawRecord>) -> (Vec<RawRecord>, DedupOutcome) {
    records.sort_by_cached_key(|r| (Reverse(completeness_score(r)), r.seq));

    let mut state = DedupState::default();
    let mut outcome = DedupOutcome::default();
    let mut survivors = Vec::with_capacity(records.len());

    for record in records {
        let mut duplicate_of = None;

        let doi = normalize_doi(record.doi.as_deref().unwrap_or(""));
        if !doi.is_empty() && state.check_doi(&doi) {
            duplicate_of = Some(DedupMethod::Doi);
            outcome.duplicates_by_doi += 1;
        }

        if duplicate_of.is_none() {
            let fp = fingerprint(&record);
            if is_matchable(&fp) && state.check_fingerprint(fp) {
                duplicate_of = Some(DedupMethod::Fingerprint);
                outcome.duplicates_by_fingerprint += 1;
            }
        }

        match duplicate_of {
            Some(method) => outcome.removed.push(RemovedRecord {
                method,
                source_db: record.source_db,
            }),
            None => survivors.push(record),
        }
    }

    debug!(
        survivors = survivors.len(),
        by_doi = outcome.duplicates_by_doi,
        by_fingerprint = outcome.duplicates_by_fingerprint,
        "deduplication pass complete"
    );

    (survivors, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceDatabase;

    fn record(title: &str, doi: &str, seq: u64) -> RawRecord {
        let mut r = RawRecord::new(SourceDatabase::Unknown);
        if !title.is_empty() {
            r.title = Some(title.to_string());
        }
        if !doi.is_empty() {
            r.doi = Some(doi.to_string());
        }
        r.seq = seq;
        r
    }

    #[test]
    fn test_completeness_score_weights() {
        let mut r = record("A Study", "", 0);
        assert_eq!(completeness_score(&r), 1);
        r.doi = Some("10.1/x".to_string());
        assert_eq!(completeness_score(&r), 12);
        r.pmid = Some("12345".to_string());
        assert_eq!(completeness_score(&r), 18);
        r.abstract_text = Some("text".to_string());
        assert_eq!(completeness_score(&r), 24);
    }

    #[test]
    fn test_doi_duplicate_removed_across_prefixes() {
        let a = record("First version", "https://doi.org/10.1/x", 0);
        let b = record("Second version", "10.1/x", 1);
        let (survivors, outcome) = deduplicate(vec![a, b]);
        assert_eq!(survivors.len(), 1);
        assert_eq!(outcome.duplicates_by_doi, 1);
        assert_eq!(outcome.duplicates_by_fingerprint, 0);
    }

    #[test]
    fn test_doi_comparison_case_insensitive() {
        let a = record("One", "10.1/ABC", 0);
        let b = record("Two", "10.1/abc", 1);
        let (survivors, outcome) = deduplicate(vec![a, b]);
        assert_eq!(survivors.len(), 1);
        assert_eq!(outcome.duplicates_by_doi, 1);
    }

    #[test]
    fn test_most_complete_record_survives() {
        let sparse = record("A Longer Study Title For Matching", "10.1/x", 0);
        let mut rich = record("A Longer Study Title For Matching", "10.1/x", 1);
        rich.abstract_text = Some("An abstract".to_string());
        rich.pmid = Some("999".to_string());

        let (survivors, _) = deduplicate(vec![sparse, rich]);
        assert_eq!(survivors.len(), 1);
        assert!(survivors[0].abstract_text.is_some());
    }

    #[test]
    fn test_tie_break_prefers_first_ingested() {
        let a = record("Identical Completeness Title Here", "", 0);
        let b = record("Identical Completeness Title Here", "", 1);
        let (survivors, outcome) = deduplicate(vec![b, a]);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].seq, 0);
        assert_eq!(outcome.duplicates_by_fingerprint, 1);
    }

    #[test]
    fn test_no_signal_records_never_collapsed() {
        let a = record("", "", 0);
        let b = record("", "", 1);
        let (survivors, outcome) = deduplicate(vec![a, b]);
        assert_eq!(survivors.len(), 2);
        assert_eq!(outcome.total_duplicates(), 0);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let make = || {
            vec![
                record("Alpha Study of Something Long", "10.1/a", 0),
                record("Beta Study of Something Long", "", 1),
                record("Alpha Study of Something Long", "10.1/a", 2),
                record("Beta Study of Something Long", "", 3),
            ]
        };
        let (s1, o1) = deduplicate(make());
        let (s2, o2) = deduplicate(make());
        assert_eq!(s1, s2);
        assert_eq!(o1.duplicates_by_doi, o2.duplicates_by_doi);
        assert_eq!(o1.duplicates_by_fingerprint, o2.duplicates_by_fingerprint);
        assert_eq!(o1.removed, o2.removed);
    }

    #[test]
    fn test_provenance_records_source_of_removed_copy() {
        let mut a = record("Same Work Described Twice Over", "10.1/x", 0);
        a.source_db = SourceDatabase::Medline;
        a.abstract_text = Some("richer".to_string());
        let mut b = record("Same Work Described Twice Over", "10.1/x", 1);
        b.source_db = SourceDatabase::Embase;

        let (_, outcome) = deduplicate(vec![a, b]);
        assert_eq!(outcome.removed.len(), 1);
        assert_eq!(outcome.removed[0].method, DedupMethod::Doi);
        assert_eq!(outcome.removed[0].source_db, SourceDatabase::Embase);
    }
}
