//! The common record shape produced by every parser

use crate::sources::SourceDatabase;
use serde::{Deserialize, Serialize};

/// A bibliographic record in the common shape shared by all parsers.
///
/// Every canonical field is optional; absence propagates as an empty
/// string through to the output schema. Multi-valued fields (authors,
/// keywords, affiliations) are stored pre-joined by the parser:
/// authors by `;`, keywords and affiliations by `; `.
///
/// Records are never mutated after a parser emits them, except for the
/// global `seq` assigned at merge time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<String>,
    pub doi: Option<String>,
    pub abstract_text: Option<String>,
    pub source: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub page_start: Option<String>,
    pub page_end: Option<String>,
    pub pages: Option<String>,
    pub issn: Option<String>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    pub keywords: Option<String>,
    pub affiliations: Option<String>,
    pub url: Option<String>,
    pub pmid: Option<String>,
    pub source_abbrev: Option<String>,
    pub doc_type: Option<String>,

    /// Source database tag attached at ingestion
    pub source_db: SourceDatabase,
    /// Global sequence number, assigned at merge time in caller-supplied
    /// file order. Tie-break for the completeness sort.
    pub seq: u64,
}

impl RawRecord {
    /// Create an empty record tagged with its source database
    pub fn new(source_db: SourceDatabase) -> Self {
        Self {
            source_db,
            ..Self::default()
        }
    }

    /// All canonical field values, in declaration order
    pub(crate) fn fields(&self) -> [&Option<String>; 20] {
        [
            &self.title,
            &self.authors,
            &self.year,
            &self.doi,
            &self.abstract_text,
            &self.source,
            &self.volume,
            &self.issue,
            &self.page_start,
            &self.page_end,
            &self.pages,
            &self.issn,
            &self.publisher,
            &self.language,
            &self.keywords,
            &self.affiliations,
            &self.url,
            &self.pmid,
            &self.source_abbrev,
            &self.doc_type,
        ]
    }

    /// Number of canonical fields carrying a non-empty value
    pub fn field_count(&self) -> usize {
        self.fields()
            .iter()
            .filter(|f| matches!(f.as_deref(), Some(v) if !v.trim().is_empty()))
            .count()
    }
}
