//! Tagged line-record (RIS-like) parsing
//!
//! Parses the tagged export format produced by MEDLINE, Embase,
//! Cochrane, Scopus, and Web of Science. Each meaningful line has the
//! form `XX  - value`; everything else is inert.

mod builder;
mod parser;

pub use parser::parse;
