use serde::{Deserialize, Serialize};

/// Pairwise scoring strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Local alignment under a substitution matrix and affine gap costs
    #[default]
    Alignment,
    /// Position-by-position substitution score averaged over the motif width
    Positional,
}

impl Strategy {
    /// Name of the matrix used when none is configured explicitly
    #[must_use]
    pub fn default_matrix(self) -> &'static str {
        match self {
            Self::Alignment => "PAM70",
            Self::Positional => "BLOSUM62",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alignment => write!(f, "alignment"),
            Self::Positional => write!(f, "positional"),
        }
    }
}

/// Aggregate similarity of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GroupScore {
    /// Mean of every defined pairwise score in the group
    Scored { mean: f64 },
    /// Exactly one member, so no pairs exist
    Singleton,
    /// At least one pair exists but none produced a defined score
    Degenerate,
}

impl GroupScore {
    /// The numeric score, if one exists
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Scored { mean } => Some(*mean),
            Self::Singleton | Self::Degenerate => None,
        }
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        matches!(self, Self::Singleton)
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate)
    }
}

impl std::fmt::Display for GroupScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scored { mean } => write!(f, "{mean:.4}"),
            Self::Singleton => write!(f, "singleton"),
            Self::Degenerate => write!(f, "no measurable similarity"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_score_value() {
        assert_eq!(GroupScore::Scored { mean: 2.5 }.value(), Some(2.5));
        assert_eq!(GroupScore::Singleton.value(), None);
        assert_eq!(GroupScore::Degenerate.value(), None);
        assert!(GroupScore::Singleton.is_singleton());
        assert!(!GroupScore::Degenerate.is_singleton());
        assert!(GroupScore::Degenerate.is_degenerate());
    }

    #[test]
    fn test_strategy_default_matrix() {
        assert_eq!(Strategy::Alignment.default_matrix(), "PAM70");
        assert_eq!(Strategy::Positional.default_matrix(), "BLOSUM62");
        assert_eq!(Strategy::default(), Strategy::Alignment);
    }

    #[test]
    fn test_group_score_serialization() {
        let json = serde_json::to_string(&GroupScore::Scored { mean: 1.5 }).unwrap();
        assert_eq!(json, r#"{"state":"scored","mean":1.5}"#);
        let json = serde_json::to_string(&GroupScore::Singleton).unwrap();
        assert_eq!(json, r#"{"state":"singleton"}"#);
    }
}
