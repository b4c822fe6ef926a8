//! Delimited-format parsing integration tests

mod common;

use common::fixtures::load_tabular_fixture;
use immerge_core::{tabular, SourceDatabase};

#[test]
fn test_parse_scopus_csv_fixture() {
    let content = load_tabular_fixture("scopus_sample.csv");
    let records = tabular::parse_csv(&content, SourceDatabase::Scopus).unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(
        first.title.as_deref(),
        Some("Cognitive Decline in Aging Populations")
    );
    assert_eq!(first.authors.as_deref(), Some("Wilson, R."));
    assert_eq!(first.year.as_deref(), Some("2019"));
    assert_eq!(first.doi.as_deref(), Some("10.1000/jmed.2019.007"));
    assert_eq!(first.source.as_deref(), Some("Journal of Medical Research"));
    assert_eq!(first.source_db, SourceDatabase::Scopus);
}

#[test]
fn test_parse_wos_tab_delimited_fixture() {
    let content = load_tabular_fixture("wos_savedrecs.txt");
    let records = tabular::parse_tsv(&content, SourceDatabase::WebOfScience).unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(
        record.title.as_deref(),
        Some("Urban air quality and respiratory health")
    );
    assert_eq!(
        record.doi.as_deref(),
        Some("https://doi.org/10.1000/jenv.2022.088")
    );
}
