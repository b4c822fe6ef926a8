//! Text and identifier normalization for duplicate matching

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Resolver and scheme prefixes stripped from DOIs before comparison
const DOI_PREFIXES: [&str; 6] = [
    "https://dx.doi.org/",
    "https://doi.org/",
    "http://doi.org/",
    "http://dx.doi.org/",
    "doi:",
    "doi.org/",
];

lazy_static! {
    static ref YEAR_TOKEN: Regex = Regex::new(r"(19|20)\d{2}").unwrap();
}

/// Strip known resolver prefixes from a DOI.
///
/// Prefix matching is case-insensitive; the remainder is returned
/// unmodified in case. Idempotent: normalizing an already-normalized
/// DOI is a no-op.
pub fn normalize_doi(doi: &str) -> String {
    let mut rest = doi.trim();
    for prefix in DOI_PREFIXES {
        if let Some(head) = rest.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                rest = &rest[prefix.len()..];
            }
        }
    }
    rest.trim().to_string()
}

/// Normalize free text for comparison.
///
/// Lowercases, folds diacritics (NFD decomposition, combining marks
/// discarded), replaces punctuation with spaces, and collapses
/// whitespace runs. Deterministic and locale-independent.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    collapse_whitespace(&folded).trim().to_string()
}

/// First 4-digit token beginning "19" or "20" anywhere in the text
pub(crate) fn extract_year(text: &str) -> Option<String> {
    YEAR_TOKEN.find(text).map(|m| m.as_str().to_string())
}

/// Collapse whitespace runs into single spaces
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(c);
            prev_was_space = false;
        }
    }
    out
}
