//! Amino acid substitution matrices.
//!
//! Named matrices (BLOSUM45, BLOSUM62, PAM70, PAM250) are embedded at compile
//! time from `matrices/substitution_matrices.json`, which `build.rs` checks for
//! shape and symmetry. Custom tables can be read from CSV/TSV files with
//! [`crate::parsing::matrix::parse_matrix_file`].

use serde::Deserialize;
use thiserror::Error;

/// Symbols every matrix must define: unknown residue and gap/non-standard residue
pub const REQUIRED_EXTENSION_SYMBOLS: [char; 2] = ['X', '*'];

/// Marker for a byte with no row in the matrix
const NO_INDEX: u8 = u8::MAX;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Failed to parse embedded matrices: {0}")]
    Embedded(#[from] serde_json::Error),

    #[error("Unknown substitution matrix '{name}' (available: {available})")]
    UnknownMatrix { name: String, available: String },

    #[error("Matrix '{name}' has {rows} rows but {symbols} residue symbols")]
    NotSquare {
        name: String,
        rows: usize,
        symbols: usize,
    },

    #[error("Matrix '{name}' is not symmetric at ({a}, {b})")]
    Asymmetric { name: String, a: char, b: char },

    #[error("Matrix '{name}' lists residue '{symbol}' more than once")]
    DuplicateSymbol { name: String, symbol: char },

    #[error("Matrix '{name}' has invalid residue symbol '{symbol}'")]
    InvalidSymbol { name: String, symbol: char },

    #[error("Matrix '{name}' has no entry for required residue '{symbol}'")]
    MissingSymbol { name: String, symbol: char },
}

#[derive(Debug, Deserialize)]
struct EmbeddedMatrices {
    #[allow(dead_code)]
    version: String,
    matrices: Vec<MatrixData>,
}

#[derive(Debug, Deserialize)]
struct MatrixData {
    name: String,
    #[allow(dead_code)]
    description: String,
    alphabet: String,
    scores: Vec<Vec<i32>>,
}

/// A symmetric table of residue substitution scores.
///
/// Lookups are case-insensitive. Immutable once built, so one instance is
/// shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct SubstitutionMatrix {
    name: String,
    alphabet: Vec<char>,
    /// Byte -> row index, `NO_INDEX` when absent
    index: [u8; 256],
    /// Flattened row-major table
    scores: Vec<i32>,
}

impl SubstitutionMatrix {
    /// Build a matrix from an alphabet and one row of scores per symbol.
    ///
    /// # Errors
    ///
    /// Returns a `MatrixError` if the table is not square, not symmetric,
    /// repeats a symbol, uses a non-ASCII symbol, or lacks `X` or `*`.
    pub fn from_rows(
        name: impl Into<String>,
        alphabet: &[char],
        rows: &[Vec<i32>],
    ) -> Result<Self, MatrixError> {
        let name = name.into();
        let dim = alphabet.len();

        if rows.len() != dim || rows.iter().any(|row| row.len() != dim) {
            return Err(MatrixError::NotSquare {
                name,
                rows: rows.len(),
                symbols: dim,
            });
        }

        let mut index = [NO_INDEX; 256];
        let mut upper_alphabet = Vec::with_capacity(dim);
        for (i, &symbol) in alphabet.iter().enumerate() {
            if !symbol.is_ascii_graphic() || dim >= usize::from(NO_INDEX) {
                return Err(MatrixError::InvalidSymbol { name, symbol });
            }
            let upper = symbol.to_ascii_uppercase();
            #[allow(clippy::cast_possible_truncation)] // ASCII checked above
            let byte = upper as u8;
            if index[usize::from(byte)] != NO_INDEX {
                return Err(MatrixError::DuplicateSymbol { name, symbol: upper });
            }
            #[allow(clippy::cast_possible_truncation)] // dim < 255 checked above
            let row = i as u8;
            index[usize::from(byte)] = row;
            index[usize::from(byte.to_ascii_lowercase())] = row;
            upper_alphabet.push(upper);
        }

        for symbol in REQUIRED_EXTENSION_SYMBOLS {
            if !upper_alphabet.contains(&symbol) {
                return Err(MatrixError::MissingSymbol { name, symbol });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                if rows[i][j] != rows[j][i] {
                    return Err(MatrixError::Asymmetric {
                        name,
                        a: upper_alphabet[i],
                        b: upper_alphabet[j],
                    });
                }
            }
        }

        Ok(Self {
            name,
            alphabet: upper_alphabet,
            index,
            scores: rows.iter().flatten().copied().collect(),
        })
    }

    /// Load one of the embedded named matrices (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::UnknownMatrix` if no embedded matrix has this name.
    pub fn named(name: &str) -> Result<Self, MatrixError> {
        let embedded = load_embedded()?;
        let data = embedded
            .matrices
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| MatrixError::UnknownMatrix {
                name: name.to_string(),
                available: embedded
                    .matrices
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        let alphabet: Vec<char> = data.alphabet.chars().collect();
        Self::from_rows(data.name.clone(), &alphabet, &data.scores)
    }

    /// Names of the embedded matrices
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::Embedded` if the embedded resource cannot be parsed.
    pub fn available() -> Result<Vec<String>, MatrixError> {
        Ok(load_embedded()?
            .matrices
            .into_iter()
            .map(|m| m.name)
            .collect())
    }

    /// Score a pair of residues, or None if either is not in the alphabet
    #[must_use]
    pub fn score(&self, a: u8, b: u8) -> Option<i32> {
        Some(self.score_at(self.index_of(a)?, self.index_of(b)?))
    }

    /// Row index of a residue, or None if it is not in the alphabet
    #[must_use]
    pub fn index_of(&self, residue: u8) -> Option<usize> {
        match self.index[usize::from(residue)] {
            NO_INDEX => None,
            i => Some(usize::from(i)),
        }
    }

    /// Score two residues by row index, as returned by [`Self::index_of`]
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the alphabet.
    #[must_use]
    pub fn score_at(&self, i: usize, j: usize) -> i32 {
        self.scores[i * self.alphabet.len() + j]
    }

    /// Whether the residue has a row in this matrix
    #[must_use]
    pub fn contains(&self, residue: u8) -> bool {
        self.index[usize::from(residue)] != NO_INDEX
    }

    /// Matrix name (e.g. "PAM70")
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Residue symbols in row order
    #[must_use]
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }
}

fn load_embedded() -> Result<EmbeddedMatrices, MatrixError> {
    // Embedded at compile time, validated by build.rs
    const EMBEDDED_MATRICES: &str = include_str!("../../matrices/substitution_matrices.json");
    Ok(serde_json::from_str(EMBEDDED_MATRICES)?)
}
