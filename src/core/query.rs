use crate::utils::validation::{sanitize_file_component, ValidationError};

/// A query peptide read from an external FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetQuery {
    /// Record identifier, conventionally `DB-ID|Chain-Range|Name`
    pub id: String,

    /// Upper-case residue sequence
    pub sequence: String,
}

impl TargetQuery {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    /// Filesystem-safe code built from the first two `|`-delimited identifier fields.
    ///
    /// `7BZ5_1|Chain_A_433-510|Spike_protein_S1` becomes `7BZ5_1Chain_A_433-510`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if nothing filesystem-safe remains.
    pub fn short_code(&self) -> Result<String, ValidationError> {
        let code: String = self.id.split('|').take(2).collect();
        sanitize_file_component(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_code_pipe_delimited() {
        let query = TargetQuery::new("7BZ5_1|Chain_A_433-510|Spike_protein_S1", "NITNLCPF");
        assert_eq!(query.short_code().unwrap(), "7BZ5_1Chain_A_433-510");
    }

    #[test]
    fn test_short_code_without_pipes() {
        let query = TargetQuery::new("peptide_1", "NITNLCPF");
        assert_eq!(query.short_code().unwrap(), "peptide_1");
    }

    #[test]
    fn test_short_code_strips_unsafe_characters() {
        let query = TargetQuery::new("sp/P0|A 1|x", "AAAA");
        assert_eq!(query.short_code().unwrap(), "spP0A1");

        let query = TargetQuery::new("|||", "AAAA");
        assert!(query.short_code().is_err());
    }
}
