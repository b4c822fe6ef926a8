//! Parser-local record assembly
//!
//! Multi-valued tags (authors, keywords, affiliations) accumulate into
//! ordered lists; the builder joins them into a single delimited string
//! only when the record closes. Single-valued fields keep their first
//! occurrence: the most authoritative value is whichever appears first.

use lazy_static::lazy_static;
use regex::Regex;

use crate::deduplication::extract_year;
use crate::domain::RawRecord;
use crate::sources::SourceDatabase;

lazy_static! {
    static ref TRAILING_PAREN: Regex = Regex::new(r"\s*\([^)]*\)\s*$").unwrap();
}

pub(super) struct RecordBuilder {
    record: RawRecord,
    authors: Vec<String>,
    keywords: Vec<String>,
    affiliations: Vec<String>,
    touched: bool,
}

impl RecordBuilder {
    pub(super) fn new(source_db: SourceDatabase) -> Self {
        Self {
            record: RawRecord::new(source_db),
            authors: Vec::new(),
            keywords: Vec::new(),
            affiliations: Vec::new(),
            touched: false,
        }
    }

    /// Seed a record opened by a `TY` tag
    pub(super) fn set_doc_type(&mut self, value: &str) {
        self.record.doc_type = Some(value.to_string());
        self.touched = true;
    }

    /// Route a tag to its canonical field. Unmapped tags are ignored.
    pub(super) fn apply_tag(&mut self, tag: &str, value: &str) {
        match tag {
            "TI" | "T1" => self.touched |= set_once(&mut self.record.title, value),
            "AU" | "A1" | "A2" => {
                self.authors.push(value.to_string());
                self.touched = true;
            }
            // Year tags re-extract a 4-digit token; a value without one
            // leaves the year unset for that occurrence
            "PY" | "Y1" | "DA" | "Y2" => {
                if let Some(year) = extract_year(value) {
                    self.record.year = Some(year);
                    self.touched = true;
                }
            }
            "AB" | "N2" => self.touched |= set_once(&mut self.record.abstract_text, value),
            "DO" => self.touched |= set_once(&mut self.record.doi, value),
            "JF" | "T2" => self.touched |= set_once(&mut self.record.source, value),
            "JO" | "JA" | "J2" => self.touched |= set_once(&mut self.record.source_abbrev, value),
            "VL" => self.touched |= set_once(&mut self.record.volume, value),
            "IS" => self.touched |= set_once(&mut self.record.issue, value),
            "SP" => self.touched |= set_once(&mut self.record.page_start, value),
            "EP" => self.touched |= set_once(&mut self.record.page_end, value),
            "SN" => {
                if self.record.issn.is_none() {
                    if let Some(issn) = clean_issn(value) {
                        self.record.issn = Some(issn);
                        self.touched = true;
                    }
                }
            }
            "PB" => self.touched |= set_once(&mut self.record.publisher, value),
            "LA" => self.touched |= set_once(&mut self.record.language, value),
            "KW" => {
                self.keywords.push(value.to_string());
                self.touched = true;
            }
            "UR" | "L2" => self.touched |= set_once(&mut self.record.url, value),
            "AD" => {
                self.affiliations.push(value.to_string());
                self.touched = true;
            }
            "PM" | "C2" => self.touched |= set_once(&mut self.record.pmid, value),
            _ => {}
        }
    }

    /// Finalize into an immutable record; `None` if nothing was set
    pub(super) fn finish(mut self) -> Option<RawRecord> {
        if !self.authors.is_empty() {
            self.record.authors = Some(self.authors.join(";"));
        }
        if !self.keywords.is_empty() {
            self.record.keywords = Some(self.keywords.join("; "));
        }
        if !self.affiliations.is_empty() {
            self.record.affiliations = Some(self.affiliations.join("; "));
        }
        self.touched.then_some(self.record)
    }
}

/// Set a single-valued field unless an earlier tag already did
fn set_once(slot: &mut Option<String>, value: &str) -> bool {
    if slot.is_none() {
        *slot = Some(value.to_string());
        true
    } else {
        false
    }
}

/// Strip a trailing parenthetical suffix such as `(ISSN)`, then keep
/// only the first whitespace-separated token
fn clean_issn(value: &str) -> Option<String> {
    let cleaned = TRAILING_PAREN.replace(value, "");
    cleaned.split_whitespace().next().map(str::to_string)
}
