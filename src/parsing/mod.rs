//! Readers for query peptides and custom substitution tables.
//!
//! - **FASTA files**: Multi-record query peptides, optionally gzip compressed
//! - **Substitution tables**: CSV/TSV square matrices with residue headers
//!
//! Any input path ending in `.gz` or `.bgz` is decompressed transparently.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sub_cut::parsing::fasta::parse_query_file;
//! use std::path::Path;
//!
//! let queries = parse_query_file(Path::new("targets.fasta")).unwrap();
//! for query in &queries {
//!     println!("{} ({} residues)", query.id, query.sequence.len());
//! }
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::matching::matrix::MatrixError;
use crate::utils::validation::MAX_QUERY_RECORDS;

pub mod fasta;
pub mod matrix;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Too many records: {0} exceeds maximum allowed ({MAX_QUERY_RECORDS})")]
    TooManyRecords(usize),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a file for buffered reading, decompressing gzip/bgzip by extension.
///
/// # Errors
///
/// Returns an IO error if the file cannot be opened.
pub fn open_input(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        // bgzip is a series of gzip members
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
