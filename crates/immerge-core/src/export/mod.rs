//! Conversion to the fixed Scopus-format output schema
//!
//! The output table always carries exactly 44 columns in a fixed
//! order, regardless of which fields were populated; semantically
//! absent columns are emitted as empty strings. This is the layout
//! Biblioshiny/Bibliometrix imports as "Scopus csv".

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deduplication::{extract_year, normalize_doi};
use crate::domain::RawRecord;

/// Numeric base for synthesized EIDs
const EID_BASE: u64 = 85_000_000_000;

/// The 44 output columns, in the declared order
pub const SCOPUS_COLUMNS: [&str; 45] = [
    "Authors",
    "Author full names",
    "Author(s) ID",
    "Title",
    "Year",
    "Source title",
    "Volume",
    "Issue",
    "Art. No.",
    "Page start",
    "Page end",
    "Cited by",
    "DOI",
    "Link",
    "Affiliations",
    "Authors with affiliations",
    "Abstract",
    "Author Keywords",
    "Index Keywords",
    "Molecular Sequence Numbers",
    "Chemicals/CAS",
    "Tradenames",
    "Manufacturers",
    "Funding Details",
    "Funding Texts",
    "References",
    "Correspondence Address",
    "Editors",
    "Publisher",
    "Sponsors",
    "Conference name",
    "Conference date",
    "Conference location",
    "Conference code",
    "ISSN",
    "ISBN",
    "CODEN",
    "PubMed ID",
    "Language of Original Document",
    "Abbreviated Source Title",
    "Document Type",
    "Publication Stage",
    "Open Access",
    "Source",
    "EID",
];

/// Export error
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// One row of the fixed output schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopusRecord {
    pub authors: String,
    pub author_full_names: String,
    pub author_ids: String,
    pub title: String,
    pub year: String,
    pub source_title: String,
    pub volume: String,
    pub issue: String,
    pub art_no: String,
    pub page_start: String,
    pub page_end: String,
    pub cited_by: String,
    pub doi: String,
    pub link: String,
    pub affiliations: String,
    pub authors_with_affiliations: String,
    pub abstract_text: String,
    pub author_keywords: String,
    pub index_keywords: String,
    pub molecular_sequence_numbers: String,
    pub chemicals_cas: String,
    pub tradenames: String,
    pub manufacturers: String,
    pub funding_details: String,
    pub funding_texts: String,
    pub references: String,
    pub correspondence_address: String,
    pub editors: String,
    pub publisher: String,
    pub sponsors: String,
    pub conference_name: String,
    pub conference_date: String,
    pub conference_location: String,
    pub conference_code: String,
    pub issn: String,
    pub isbn: String,
    pub coden: String,
    pub pubmed_id: String,
    pub language: String,
    pub abbreviated_source_title: String,
    pub document_type: String,
    pub publication_stage: String,
    pub open_access: String,
    pub source: String,
    pub eid: String,
}

impl ScopusRecord {
    /// Field values in declared column order
    pub fn to_row(&self) -> [&str; 45] {
        [
            self.authors.as_str(),
            self.author_full_names.as_str(),
            self.author_ids.as_str(),
            self.title.as_str(),
            self.year.as_str(),
            self.source_title.as_str(),
            self.volume.as_str(),
            self.issue.as_str(),
            self.art_no.as_str(),
            self.page_start.as_str(),
            self.page_end.as_str(),
            self.cited_by.as_str(),
            self.doi.as_str(),
            self.link.as_str(),
            self.affiliations.as_str(),
            self.authors_with_affiliations.as_str(),
            self.abstract_text.as_str(),
            self.author_keywords.as_str(),
            self.index_keywords.as_str(),
            self.molecular_sequence_numbers.as_str(),
            self.chemicals_cas.as_str(),
            self.tradenames.as_str(),
            self.manufacturers.as_str(),
            self.funding_details.as_str(),
            self.funding_texts.as_str(),
            self.references.as_str(),
            self.correspondence_address.as_str(),
            self.editors.as_str(),
            self.publisher.as_str(),
            self.sponsors.as_str(),
            self.conference_name.as_str(),
            self.conference_date.as_str(),
            self.conference_location.as_str(),
            self.conference_code.as_str(),
            self.issn.as_str(),
            self.isbn.as_str(),
            self.coden.as_str(),
            self.pubmed_id.as_str(),
            self.language.as_str(),
            self.abbreviated_source_title.as_str(),
            self.document_type.as_str(),
            self.publication_stage.as_str(),
            self.open_access.as_str(),
            self.source.as_str(),
            self.eid.as_str(),
        ]
    }
}

/// Convert surviving records into the fixed 44-column schema, in
/// surviving order
pub fn convert(records: &[RawRecord]) -> Vec<ScopusRecord> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| convert_record(record, index))
        .collect()
}

fn convert_record(record: &RawRecord, index: usize) -> ScopusRecord {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();

    // Split a combined page range only when no explicit start was given
    let mut page_start = field(&record.page_start);
    let mut page_end = field(&record.page_end);
    if page_start.is_empty() {
        if let Some(pages) = record.pages.as_deref().filter(|p| !p.is_empty()) {
            if pages.contains('-') {
                let mut parts = pages.split('-');
                page_start = parts.next().unwrap_or("").trim().to_string();
                page_end = parts.next_back().unwrap_or("").trim().to_string();
            } else {
                page_start = pages.to_string();
            }
        }
    }

    // Defensive re-parse: the year column carries a bare 4-digit token
    let year = record
        .year
        .as_deref()
        .and_then(extract_year)
        .unwrap_or_default();

    let language = record
        .language
        .clone()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| "English".to_string());

    let authors = field(&record.authors);

    ScopusRecord {
        authors: authors.clone(),
        author_full_names: authors,
        title: field(&record.title),
        year,
        source_title: field(&record.source),
        volume: field(&record.volume),
        issue: field(&record.issue),
        page_start,
        page_end,
        cited_by: "0".to_string(),
        doi: normalize_doi(record.doi.as_deref().unwrap_or("")),
        link: field(&record.url),
        affiliations: field(&record.affiliations),
        abstract_text: field(&record.abstract_text),
        author_keywords: field(&record.keywords),
        publisher: field(&record.publisher),
        issn: field(&record.issn),
        pubmed_id: field(&record.pmid),
        language,
        abbreviated_source_title: field(&record.source_abbrev),
        document_type: "Article".to_string(),
        publication_stage: "Final".to_string(),
        source: "Scopus".to_string(),
        eid: format!("2-s2.0-{}", EID_BASE + index as u64),
        ..ScopusRecord::default()
    }
}

/// Write records as CSV with the fixed 44-column header row
pub fn write_csv<W: io::Write>(records: &[ScopusRecord], writer: W) -> Result<(), ExportError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(SCOPUS_COLUMNS)?;
    for record in records {
        w.write_record(record.to_row())?;
    }
    w.flush()?;
    Ok(())
}

/// Publication-year distribution of the surviving records
pub fn year_histogram(records: &[RawRecord]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        if let Some(year) = record.year.as_deref().and_then(extract_year) {
            if let Ok(y) = year.parse::<i32>() {
                *counts.entry(y).or_insert(0) += 1;
            }
        }
    }
    counts
}
