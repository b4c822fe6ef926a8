//! Command-line front end for immerge-core: merge citation exports,
//! remove duplicates, and write a Scopus-format CSV.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use immerge_core::{
    convert, ingest, merge_and_dedupe_with_summary, write_csv, year_histogram, RawRecord,
    SourceDatabase,
};

#[derive(Parser, Debug)]
#[command(
    name = "immerge",
    about = "Merge bibliographic exports from multiple literature databases, \
             deduplicate by DOI and fingerprint, and write a Scopus-format CSV"
)]
struct Cli {
    /// Input files (.ris, .csv, .tsv, .txt)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output CSV path
    #[arg(short, long, default_value = "merged_references_scopus.csv")]
    output: PathBuf,

    /// Override source detection for a file, as FILE=SOURCE
    /// (e.g. refs.ris=Embase); repeatable
    #[arg(long = "label", value_name = "FILE=SOURCE")]
    labels: Vec<String>,

    /// Print the merge summary as JSON to stdout
    #[arg(long)]
    stats_json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let labels = parse_labels(&cli.labels)?;

    let mut batches: Vec<Vec<RawRecord>> = Vec::new();
    let mut per_file: Vec<(String, usize)> = Vec::new();
    for path in &cli.files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };

        let source_override = labels.get(file_name.as_str()).copied();
        match ingest(&file_name, &bytes, source_override) {
            Ok(records) => {
                per_file.push((file_name, records.len()));
                batches.push(records);
            }
            Err(e) => warn!(file = %path.display(), error = %e, "skipping unparsable file"),
        }
    }

    if batches.is_empty() {
        bail!("no readable input files");
    }

    let (survivors, outcome, summary) = merge_and_dedupe_with_summary(batches);

    let table = convert(&survivors);
    let out = fs::File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    write_csv(&table, out).with_context(|| format!("writing {}", cli.output.display()))?;

    // PRISMA-style identification/screening/included counts
    println!("Identification");
    for (name, count) in &per_file {
        println!("  {name}: {count} records");
    }
    println!("  Total records identified: {}", summary.total_parsed);
    println!("Screening");
    println!("  Duplicates removed by DOI: {}", summary.duplicates_by_doi);
    println!(
        "  Duplicates removed by fingerprint: {}",
        summary.duplicates_by_fingerprint
    );
    println!("  Total duplicates removed: {}", outcome.total_duplicates());
    println!("Included");
    println!("  Unique records: {}", summary.unique_records);

    let years = year_histogram(&survivors);
    if let (Some(first), Some(last)) = (years.keys().next(), years.keys().next_back()) {
        println!("  Publication years: {first}-{last}");
    }
    println!("Wrote {}", cli.output.display());

    if cli.stats_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

/// Parse repeated `FILE=SOURCE` assignments into a lookup map
fn parse_labels(labels: &[String]) -> Result<HashMap<String, SourceDatabase>> {
    let mut map = HashMap::new();
    for label in labels {
        let Some((file, source)) = label.split_once('=') else {
            bail!("invalid --label {label:?}, expected FILE=SOURCE");
        };
        let Some(db) = SourceDatabase::from_label(source) else {
            bail!(
                "unknown source {source:?} in --label {label:?}; \
                 expected one of MEDLINE, Embase, Cochrane, Scopus, Web of Science, Unknown"
            );
        };
        map.insert(file.to_string(), db);
    }
    Ok(map)
}
