//! Delimited tabular parsing (CSV and TSV exports)
//!
//! Header names are lower-cased, trimmed, and mapped through a fixed
//! alias table to canonical fields; unmapped headers are ignored by the
//! rest of the pipeline. Rows with the wrong column count are skipped
//! individually rather than aborting the parse.

use crate::domain::RawRecord;
use crate::sources::SourceDatabase;

/// Canonical destination for a header column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Title,
    Authors,
    Year,
    Abstract,
    Doi,
    Source,
    Issn,
    Volume,
    Issue,
    Pages,
    Keywords,
    Language,
    Affiliations,
    Publisher,
    DocType,
    Url,
    Pmid,
    Ignored,
}

/// Fixed alias table covering Scopus, Web of Science, and generic
/// export header vocabularies
fn map_header(name: &str) -> Column {
    match name {
        "title" | "article title" | "document title" | "ti" => Column::Title,
        "authors" | "author" | "au" => Column::Authors,
        "year" | "publication year" | "py" | "pubyear" => Column::Year,
        "abstract" | "ab" => Column::Abstract,
        "doi" | "di" => Column::Doi,
        "journal" | "source" | "source title" | "so" => Column::Source,
        "issn" | "sn" => Column::Issn,
        "volume" | "vl" => Column::Volume,
        "issue" | "is" => Column::Issue,
        "pages" | "page" => Column::Pages,
        "keywords" | "author keywords" | "de" => Column::Keywords,
        "language" | "la" => Column::Language,
        "affiliations" | "affiliation" => Column::Affiliations,
        "publisher" | "pu" => Column::Publisher,
        "document type" | "type" | "dt" => Column::DocType,
        "url" | "link" => Column::Url,
        "pmid" | "pubmed id" => Column::Pmid,
        _ => Column::Ignored,
    }
}

/// Parse comma-delimited content
pub fn parse_csv(content: &str, source_db: SourceDatabase) -> Result<Vec<RawRecord>, csv::Error> {
    parse(content, b',', source_db)
}

/// Parse tab-delimited content
pub fn parse_tsv(content: &str, source_db: SourceDatabase) -> Result<Vec<RawRecord>, csv::Error> {
    parse(content, b'\t', source_db)
}

/// Parse delimited content with a header row into records, in file
/// order. Unreadable or wrong-width rows are skipped.
pub fn parse(
    content: &str,
    delimiter: u8,
    source_db: SourceDatabase,
) -> Result<Vec<RawRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<Column> = reader
        .headers()?
        .iter()
        .map(|h| map_header(h.trim().to_lowercase().as_str()))
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let Ok(row) = row else {
            continue;
        };
        if row.len() != columns.len() {
            continue;
        }

        let mut record = RawRecord::new(source_db);
        for (column, value) in columns.iter().zip(row.iter()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match column {
                Column::Title => &mut record.title,
                Column::Authors => &mut record.authors,
                Column::Year => &mut record.year,
                Column::Abstract => &mut record.abstract_text,
                Column::Doi => &mut record.doi,
                Column::Source => &mut record.source,
                Column::Issn => &mut record.issn,
                Column::Volume => &mut record.volume,
                Column::Issue => &mut record.issue,
                Column::Pages => &mut record.pages,
                Column::Keywords => &mut record.keywords,
                Column::Language => &mut record.language,
                Column::Affiliations => &mut record.affiliations,
                Column::Publisher => &mut record.publisher,
                Column::DocType => &mut record.doc_type,
                Column::Url => &mut record.url,
                Column::Pmid => &mut record.pmid,
                Column::Ignored => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
        records.push(record);
    }

    Ok(records)
}
