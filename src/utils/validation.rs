//! Centralized validation and helper functions.

/// Default ceiling on distinct sequences per group; groups at or above it are dropped
pub const DEFAULT_GROUP_SIZE_CEILING: usize = 5_000;

/// Maximum number of query records accepted from one FASTA file (DOS protection)
pub const MAX_QUERY_RECORDS: usize = 100_000;

/// Security-related constants for output naming
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Residue symbols accepted in motif and query sequences.
///
/// The 20 standard amino acids, the ambiguity codes B and Z, X for an unknown
/// residue and `*` for a gap or non-standard residue.
pub const RESIDUE_ALPHABET: &str = "ARNDCQEGHILKMFPSTWYVBZX*";

/// Check whether a byte is a recognised residue symbol (case-insensitive).
///
/// # Examples
///
/// ```
/// use sub_cut::utils::validation::is_valid_residue;
///
/// assert!(is_valid_residue(b'A'));
/// assert!(is_valid_residue(b'k'));
/// assert!(is_valid_residue(b'*'));
/// assert!(!is_valid_residue(b'J'));
/// ```
#[must_use]
pub fn is_valid_residue(residue: u8) -> bool {
    RESIDUE_ALPHABET
        .as_bytes()
        .contains(&residue.to_ascii_uppercase())
}

/// Normalize a sequence: trim surrounding whitespace and upper-case it.
/// Returns None if the result is empty or contains unrecognised residues.
#[must_use]
pub fn normalize_sequence(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(is_valid_residue) {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Check whether a group has reached the configured size ceiling.
///
/// Returns an error message if the group must be dropped, None if it may be kept.
#[must_use]
pub fn check_group_ceiling(size: usize, ceiling: usize) -> Option<String> {
    if size >= ceiling {
        Some(format!(
            "{size} distinct sequences reaches the ceiling of {ceiling}"
        ))
    } else {
        None
    }
}

/// Output naming validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: no safe characters remain after sanitization")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
}

/// Reduce an identifier to a filesystem-safe file name component.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`, drops everything else and
/// refuses results that are empty or start with a dot.
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the input is blank,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if nothing usable remains.
pub fn sanitize_file_component(name: &str) -> Result<String, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if name.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    let sanitized = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_')
        .collect::<String>();

    // Path traversal and hidden files
    if sanitized.is_empty() || sanitized.starts_with('.') || sanitized.contains("..") {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}
