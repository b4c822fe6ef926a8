//! Domain types shared across the merge pipeline

mod record;

pub use record::RawRecord;
