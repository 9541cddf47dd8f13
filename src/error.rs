//! Typed failures raised by the ingest and selection stages.
//!
//! Only these conditions abort a derivation pass. Classification misses,
//! unresolved geographic codes, and a too-small metric set for correlation
//! are recovered values, not errors, and never appear here.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal ingest failure; nothing downstream runs once one of these is raised.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Could not read input file {path:?}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),
    #[error("Input is not valid {encoding} text")]
    Undecodable { encoding: &'static str },
    #[error("Malformed CSV input")]
    Csv(#[from] csv::Error),
    #[error("Input has no header row")]
    MissingHeader,
    #[error("Required column 'country' not found (columns: {available})")]
    MissingCountryColumn { available: String },
    #[error("Row {line} has {found} field(s) but the header has {expected}")]
    OverlongRow {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// A user selection that does not fit the active subset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Column '{0}' is not a numeric metric for the selected rows")]
    NotAMetric(String),
    #[error("Unknown continent '{0}'")]
    UnknownContinent(String),
}
