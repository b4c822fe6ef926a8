//! Tagged-format parser
//!
//! Record boundaries: a `TY` tag closes the previous record (if any)
//! and opens a new one seeded with its value; `ER` closes without
//! opening. An unterminated record at end of input is still emitted,
//! tolerating exports with missing end markers.

use super::builder::RecordBuilder;
use crate::domain::RawRecord;
use crate::sources::SourceDatabase;

/// Parse tagged content into records, in order of appearance.
///
/// Lines that do not match the tag grammar are ignored, as are tags
/// with no canonical field mapping. Empty input yields no records.
pub fn parse(content: &str, source_db: SourceDatabase) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut current = RecordBuilder::new(source_db);

    for line in content.lines() {
        let Some((tag, value)) = parse_tag_line(line) else {
            continue;
        };

        match tag {
            "ER" => {
                let done = std::mem::replace(&mut current, RecordBuilder::new(source_db));
                if let Some(record) = done.finish() {
                    records.push(record);
                }
            }
            "TY" => {
                let done = std::mem::replace(&mut current, RecordBuilder::new(source_db));
                if let Some(record) = done.finish() {
                    records.push(record);
                }
                current.set_doc_type(value);
            }
            _ => current.apply_tag(tag, value),
        }
    }

    // Missing ER at end of input: emit the open record if non-empty
    if let Some(record) = current.finish() {
        records.push(record);
    }

    records
}

/// Split a line of the form `XX  - value`.
///
/// Tags are one ASCII uppercase letter followed by an uppercase letter
/// or digit, then at least one whitespace character, a dash, optional
/// whitespace, and the value. Anything else yields `None`.
fn parse_tag_line(line: &str) -> Option<(&str, &str)> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 {
        return None;
    }
    if !bytes[0].is_ascii_uppercase() {
        return None;
    }
    if !(bytes[1].is_ascii_uppercase() || bytes[1].is_ascii_digit()) {
        return None;
    }

    let rest = &line[2..];
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        // The grammar requires whitespace between tag and dash
        return None;
    }
    let value = after_ws.strip_prefix('-')?;
    Some((&line[..2], value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_unknown(content: &str) -> Vec<RawRecord> {
        parse(content, SourceDatabase::Unknown)
    }

    #[test]
    fn test_parse_tag_line() {
        assert_eq!(parse_tag_line("TY  - JOUR"), Some(("TY", "JOUR")));
        assert_eq!(parse_tag_line("TI  - A Title"), Some(("TI", "A Title")));
        assert_eq!(parse_tag_line("A1  - Smith, J"), Some(("A1", "Smith, J")));
        assert_eq!(parse_tag_line("ER  -"), Some(("ER", "")));
        // No whitespace before the dash
        assert_eq!(parse_tag_line("TY- JOUR"), None);
        // Lowercase tag
        assert_eq!(parse_tag_line("ty  - JOUR"), None);
        assert_eq!(parse_tag_line("random text"), None);
        assert_eq!(parse_tag_line(""), None);
    }

    #[test]
    fn test_parse_simple_record() {
        let input = "TY  - JOUR\nTI  - A Study\nAU  - Smith, J\nPY  - 2020\nDO  - https://doi.org/10.1/x\nER  - ";
        let records = parse_unknown(input);
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.title.as_deref(), Some("A Study"));
        assert_eq!(r.authors.as_deref(), Some("Smith, J"));
        assert_eq!(r.year.as_deref(), Some("2020"));
        assert_eq!(r.doi.as_deref(), Some("https://doi.org/10.1/x"));
        assert_eq!(r.doc_type.as_deref(), Some("JOUR"));
    }

    #[test]
    fn test_multiple_authors_accumulate_in_order() {
        let input = "TY  - JOUR\nAU  - Smith, John\nAU  - Doe, Jane\nA2  - Wilson, Bob\nER  -";
        let records = parse_unknown(input);
        assert_eq!(
            records[0].authors.as_deref(),
            Some("Smith, John;Doe, Jane;Wilson, Bob")
        );
    }

    #[test]
    fn test_keywords_and_affiliations_joined() {
        let input = "TY  - JOUR\nKW  - sleep\nKW  - memory\nAD  - Dept A\nAD  - Dept B\nER  -";
        let records = parse_unknown(input);
        assert_eq!(records[0].keywords.as_deref(), Some("sleep; memory"));
        assert_eq!(records[0].affiliations.as_deref(), Some("Dept A; Dept B"));
    }

    #[test]
    fn test_first_value_wins_for_single_valued_fields() {
        let input = "TY  - JOUR\nTI  - Authoritative Title\nTI  - Later Title\nER  -";
        let records = parse_unknown(input);
        assert_eq!(records[0].title.as_deref(), Some("Authoritative Title"));
    }

    #[test]
    fn test_ty_starts_new_record() {
        let input = "TY  - JOUR\nTI  - First\nTY  - BOOK\nTI  - Second\nER  -";
        let records = parse_unknown(input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("First"));
        assert_eq!(records[0].doc_type.as_deref(), Some("JOUR"));
        assert_eq!(records[1].title.as_deref(), Some("Second"));
        assert_eq!(records[1].doc_type.as_deref(), Some("BOOK"));
    }

    #[test]
    fn test_unterminated_record_emitted() {
        let input = "TY  - JOUR\nTI  - No End Marker";
        let records = parse_unknown(input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("No End Marker"));
    }

    #[test]
    fn test_year_extracted_from_date_value() {
        let input = "TY  - JOUR\nPY  - 2020/03/15\nER  -";
        let records = parse_unknown(input);
        assert_eq!(records[0].year.as_deref(), Some("2020"));
    }

    #[test]
    fn test_year_tag_without_token_leaves_year_unset() {
        let input = "TY  - JOUR\nPY  - in press\nER  -";
        let records = parse_unknown(input);
        assert_eq!(records[0].year, None);
    }

    #[test]
    fn test_issn_cleanup() {
        let input = "TY  - JOUR\nSN  - 1234-5678 (ISSN)\nER  -";
        let records = parse_unknown(input);
        assert_eq!(records[0].issn.as_deref(), Some("1234-5678"));

        let input = "TY  - JOUR\nSN  - 1234-5678 8765-4321\nER  -";
        let records = parse_unknown(input);
        assert_eq!(records[0].issn.as_deref(), Some("1234-5678"));
    }

    #[test]
    fn test_malformed_lines_ignored() {
        let input = "garbage line\nTY  - JOUR\n???\nTI  - Valid\n\nER  -\nmore garbage";
        let records = parse_unknown(input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Valid"));
    }

    #[test]
    fn test_unmapped_tags_ignored() {
        let input = "TY  - JOUR\nTI  - A Study\nN1  - some note\nC7  - 104231\nER  -";
        let records = parse_unknown(input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field_count(), 2); // title + doc_type
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_unknown("").is_empty());
        assert!(parse_unknown("\n\n\n").is_empty());
    }

    #[test]
    fn test_source_tag_applied() {
        let input = "TY  - JOUR\nTI  - T\nER  -";
        let records = parse(input, SourceDatabase::Embase);
        assert_eq!(records[0].source_db, SourceDatabase::Embase);
    }
}
