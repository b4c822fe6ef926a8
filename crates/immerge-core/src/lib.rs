//! immerge-core: merge bibliographic citation exports from multiple
//! literature databases, remove cross-source duplicates, and emit a
//! Scopus-format table for bibliometric tools such as Biblioshiny.
//!
//! The pipeline is a sequential transform over in-memory records:
//! raw file bytes → parse (tagged or delimited) → accumulate across
//! files → deduplicate → convert to the fixed 44-column schema.
//!
//! ```
//! use immerge_core::{convert, ingest, merge_and_dedupe};
//!
//! let ris = b"TY  - JOUR\nTI  - A Study\nAU  - Smith, J\nPY  - 2020\nER  - ";
//! let records = ingest("medline_export.ris", ris, None).unwrap();
//! let (survivors, stats) = merge_and_dedupe(vec![records]);
//! let table = convert(&survivors);
//! assert_eq!(stats.total_duplicates(), 0);
//! assert_eq!(table.len(), 1);
//! ```

pub mod deduplication;
pub mod domain;
pub mod export;
pub mod import;
pub mod ris;
pub mod sources;
pub mod tabular;

// Re-export main types for convenience
pub use deduplication::{
    completeness_score, deduplicate, fingerprint, is_matchable, normalize_doi, normalize_text,
    DedupMethod, DedupOutcome, DedupState, RemovedRecord,
};
pub use domain::RawRecord;
pub use export::{
    convert, write_csv, year_histogram, ExportError, ScopusRecord, SCOPUS_COLUMNS,
};
pub use import::{
    ingest, merge_and_dedupe, merge_and_dedupe_with_summary, ImportError, InputFormat,
    MergeSummary,
};
pub use sources::SourceDatabase;
