//! Source database classification
//!
//! Maps an uploaded file's display name to the literature database it
//! came from. Detection is a fixed, ordered, case-insensitive substring
//! scan; an explicit per-file assignment from the caller always wins
//! (handled at the `import::ingest` call site).

use serde::{Deserialize, Serialize};

/// Literature database a citation export originated from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceDatabase {
    Medline,
    Embase,
    Cochrane,
    Scopus,
    WebOfScience,
    #[default]
    Unknown,
}

impl SourceDatabase {
    /// Detect the source database from a file display name.
    ///
    /// Rules are checked in priority order; the first match wins.
    /// No match is not an error and yields `Unknown`.
    pub fn detect(file_name: &str) -> Self {
        let name = file_name.to_lowercase();
        if name.contains("embase") {
            Self::Embase
        } else if name.contains("medline") || name.contains("pubmed") {
            Self::Medline
        } else if name.contains("cochrane") || name.contains("central") {
            Self::Cochrane
        } else if name.contains("scopus") {
            Self::Scopus
        } else if name.contains("wos")
            || name.contains("web of science")
            || name.contains("savedrecs")
        {
            Self::WebOfScience
        } else {
            Self::Unknown
        }
    }

    /// Display label used in summaries and duplicate provenance
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medline => "MEDLINE",
            Self::Embase => "Embase",
            Self::Cochrane => "Cochrane",
            Self::Scopus => "Scopus",
            Self::WebOfScience => "Web of Science",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a display label back into a source (used for explicit
    /// per-file assignments)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "medline" | "pubmed" => Some(Self::Medline),
            "embase" => Some(Self::Embase),
            "cochrane" | "central" => Some(Self::Cochrane),
            "scopus" => Some(Self::Scopus),
            "web of science" | "wos" => Some(Self::WebOfScience),
            "unknown" | "other" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
