//! Query peptide reader for FASTA files using noodles.
//!
//! Identifiers conventionally follow `DB-ID|Chain-Range|Name`, e.g.
//! `7BZ5_1|Chain_A_433-510|Spike_protein_S1`; see
//! [`TargetQuery::short_code`](crate::core::query::TargetQuery::short_code).
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.faa` (uncompressed)
//! - any of the above with `.gz` or `.bgz` appended (compressed)

use std::collections::HashSet;
use std::ffi::OsStr;
use std::io::BufRead;
use std::path::Path;

use noodles::fasta;

use crate::core::query::TargetQuery;
use crate::parsing::{open_input, ParseError};
use crate::utils::validation::{normalize_sequence, MAX_QUERY_RECORDS};

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);

    matches!(
        Path::new(stem)
            .extension()
            .and_then(OsStr::to_str),
        Some("fa" | "fasta" | "faa")
    )
}

/// Parse a FASTA file of query peptides.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, `ParseError::InvalidFormat` if no records are found or a
/// record is empty, malformed or duplicated, or `ParseError::TooManyRecords`
/// if the limit is exceeded.
pub fn parse_query_file(path: &Path) -> Result<Vec<TargetQuery>, ParseError> {
    let mut reader = fasta::io::Reader::new(open_input(path)?);
    parse_query_reader(&mut reader)
}

/// Parse query peptides from a noodles FASTA reader
pub fn parse_query_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<TargetQuery>, ParseError> {
    let mut queries = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        // Check record limit for DOS protection
        if queries.len() >= MAX_QUERY_RECORDS {
            return Err(ParseError::TooManyRecords(queries.len()));
        }

        let id = String::from_utf8_lossy(record.name()).to_string();
        let raw = String::from_utf8_lossy(record.sequence().as_ref()).to_string();
        let sequence = normalize_sequence(&raw).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Record '{id}' is empty or contains unrecognised residues"
            ))
        })?;

        if !seen.insert(id.clone()) {
            return Err(ParseError::InvalidFormat(format!(
                "Duplicate record identifier '{id}'"
            )));
        }

        queries.push(TargetQuery::new(id, sequence));
    }

    if queries.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fasta(content: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("targets.fa")));
        assert!(is_fasta_file(Path::new("targets.fasta")));
        assert!(is_fasta_file(Path::new("targets.faa")));
        assert!(is_fasta_file(Path::new("targets.fa.gz")));
        assert!(is_fasta_file(Path::new("/path/to/Targets.FASTA")));

        assert!(!is_fasta_file(Path::new("groups.json")));
        assert!(!is_fasta_file(Path::new("targets.txt.gz")));
    }

    #[test]
    fn test_parse_query_file() {
        let temp = write_fasta(
            b">7BZ5_1|Chain_A_433-510|Spike_protein_S1\nNITNLCPFGEVFNA\ntrfasv\n>pep2\nDEVDGSAK\n",
        );

        let queries = parse_query_file(temp.path()).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].id, "7BZ5_1|Chain_A_433-510|Spike_protein_S1");
        assert_eq!(queries[0].sequence, "NITNLCPFGEVFNATRFASV");
        assert_eq!(queries[0].short_code().unwrap(), "7BZ5_1Chain_A_433-510");
        assert_eq!(queries[1].sequence, "DEVDGSAK");
    }

    #[test]
    fn test_parse_empty_fasta() {
        let temp = write_fasta(b"");
        let err = parse_query_file(temp.path()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_parse_duplicate_ids() {
        let temp = write_fasta(b">pep\nDEVD\n>pep\nIETD\n");
        let err = parse_query_file(temp.path()).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_parse_invalid_residues() {
        let temp = write_fasta(b">pep\nDEV1D\n");
        assert!(parse_query_file(temp.path()).is_err());
    }
}
