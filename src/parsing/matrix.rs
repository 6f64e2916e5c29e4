//! Reader for custom substitution tables.
//!
//! The first row lists the residue symbols after one leading label cell, and
//! each following row starts with its residue symbol:
//!
//! ```text
//! ,A,R,N,...,X,*
//! A,4,-1,-2,...,0,-4
//! R,-1,5,0,...,-1,-4
//! ```
//!
//! Files ending in `.tsv` or `.tab` (optionally gzipped) are tab-delimited,
//! everything else comma-delimited.

use std::io::Read;
use std::path::Path;

use crate::matching::matrix::SubstitutionMatrix;
use crate::parsing::{open_input, ParseError};

/// Field delimiter for a table path
fn delimiter_for(path: &Path) -> u8 {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str.strip_suffix(".gz").unwrap_or(&path_str);
    if stem.ends_with(".tsv") || stem.ends_with(".tab") {
        b'\t'
    } else {
        b','
    }
}

/// Parse a substitution table file, named after the file stem.
///
/// # Errors
///
/// Returns `ParseError::Io` or `ParseError::Csv` if the file cannot be read,
/// `ParseError::InvalidFormat` if the layout is wrong, or `ParseError::Matrix`
/// if the table is not a valid substitution matrix.
pub fn parse_matrix_file(path: &Path) -> Result<SubstitutionMatrix, ParseError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .map(|n| n.split('.').next().unwrap_or_default().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "custom".to_string());

    parse_matrix_reader(&name, open_input(path)?, delimiter_for(path))
}

/// Parse a substitution table from any reader
pub fn parse_matrix_reader<R: Read>(
    name: &str,
    reader: R,
    delimiter: u8,
) -> Result<SubstitutionMatrix, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv_reader.records();

    let header = records
        .next()
        .ok_or_else(|| ParseError::InvalidFormat("Substitution table is empty".to_string()))??;
    let alphabet = header
        .iter()
        .skip(1)
        .map(parse_symbol)
        .collect::<Result<Vec<char>, _>>()?;

    let mut rows = Vec::with_capacity(alphabet.len());
    for (i, record) in records.enumerate() {
        let record = record?;
        let symbol = parse_symbol(record.get(0).unwrap_or_default())?;

        match alphabet.get(i) {
            Some(&expected) if expected.eq_ignore_ascii_case(&symbol) => {}
            _ => {
                return Err(ParseError::InvalidFormat(format!(
                    "Row {} is labelled '{symbol}' but the header lists residues in a different order",
                    i + 1
                )));
            }
        }

        let row = record
            .iter()
            .skip(1)
            .map(|cell| {
                cell.parse::<i32>().map_err(|_| {
                    ParseError::InvalidFormat(format!(
                        "Row '{symbol}' has non-integer score '{cell}'"
                    ))
                })
            })
            .collect::<Result<Vec<i32>, _>>()?;
        rows.push(row);
    }

    Ok(SubstitutionMatrix::from_rows(name, &alphabet, &rows)?)
}

fn parse_symbol(cell: &str) -> Result<char, ParseError> {
    let mut chars = cell.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(ParseError::InvalidFormat(format!(
            "Residue symbol '{cell}' must be a single character"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::matrix::MatrixError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SMALL_TABLE: &str = ",A,C,X,*\nA,4,0,0,-4\nC,0,9,-2,-4\nX,0,-2,-1,-4\n*,-4,-4,-4,1\n";

    #[test]
    fn test_parse_csv_table() {
        let matrix = parse_matrix_reader("small", SMALL_TABLE.as_bytes(), b',').unwrap();
        assert_eq!(matrix.name(), "small");
        assert_eq!(matrix.alphabet(), &['A', 'C', 'X', '*']);
        assert_eq!(matrix.score(b'C', b'C'), Some(9));
        assert_eq!(matrix.score(b'c', b'x'), Some(-2));
        assert_eq!(matrix.score(b'*', b'A'), Some(-4));
    }

    #[test]
    fn test_parse_tsv_file() {
        let mut temp = NamedTempFile::with_suffix(".tsv").unwrap();
        temp.write_all(SMALL_TABLE.replace(',', "\t").as_bytes())
            .unwrap();
        temp.flush().unwrap();

        let matrix = parse_matrix_file(temp.path()).unwrap();
        assert_eq!(matrix.score(b'A', b'A'), Some(4));
    }

    #[test]
    fn test_row_order_must_match_header() {
        let table = ",A,C,X,*\nC,0,9,-2,-4\nA,4,0,0,-4\nX,0,-2,-1,-4\n*,-4,-4,-4,1\n";
        let err = parse_matrix_reader("bad", table.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_non_integer_score() {
        let table = ",A,X,*\nA,4,0,x\nX,0,-1,-4\n*,-4,-4,1\n";
        let err = parse_matrix_reader("bad", table.as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("non-integer"));
    }

    #[test]
    fn test_asymmetric_table_rejected() {
        let table = ",A,X,*\nA,4,1,-4\nX,0,-1,-4\n*,-4,-4,1\n";
        let err = parse_matrix_reader("bad", table.as_bytes(), b',').unwrap_err();
        assert!(matches!(
            err,
            ParseError::Matrix(MatrixError::Asymmetric { .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let err = parse_matrix_reader("empty", "".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }
}
