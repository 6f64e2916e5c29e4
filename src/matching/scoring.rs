use thiserror::Error;

use crate::core::config::GapCosts;
use crate::core::types::Strategy;
use crate::matching::matrix::SubstitutionMatrix;

/// Marker written in place of an alignment when no local alignment scores above zero
pub const NO_ALIGNMENT_MARKER: &str = "No significant alignment was made!";

/// Far below any reachable score, but safe to add gap costs to without overflow
const NEG_INF: i32 = i32::MIN / 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("sequences differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("residue '{residue}' in '{sequence}' is not in substitution matrix {matrix}")]
    UnknownResidue {
        residue: char,
        sequence: String,
        matrix: String,
    },

    #[error("cannot score an empty sequence")]
    EmptySequence,
}

/// Best-scoring local alignment between a query and a subject sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAlignment {
    pub score: i32,
    /// Aligned query residues, `-` for gaps
    pub aligned_query: String,
    /// Aligned subject residues, `-` for gaps
    pub aligned_subject: String,
    /// `|` identity, `.` substitution, `-` gap
    pub markup: String,
    /// 0-based half-open coordinates of the aligned region
    pub query_start: usize,
    pub query_end: usize,
    pub subject_start: usize,
    pub subject_end: usize,
}

impl LocalAlignment {
    /// Render the alignment as three lines: query, markup, subject
    #[must_use]
    pub fn trace(&self) -> String {
        format!(
            "query  {:>4} {} {}\n            {}\nsite   {:>4} {} {}",
            self.query_start,
            self.aligned_query,
            self.query_end,
            self.markup,
            self.subject_start,
            self.aligned_subject,
            self.subject_end,
        )
    }
}

/// Scores one pair of sequences under a fixed strategy, matrix and gap costs.
///
/// Holds only immutable configuration, so a single scorer is shared by
/// reference across all worker threads.
#[derive(Debug, Clone)]
pub struct PairScorer {
    strategy: Strategy,
    matrix: SubstitutionMatrix,
    gaps: GapCosts,
}

impl PairScorer {
    pub fn new(strategy: Strategy, matrix: SubstitutionMatrix, gaps: GapCosts) -> Self {
        Self {
            strategy,
            matrix,
            gaps,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn matrix(&self) -> &SubstitutionMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn gaps(&self) -> GapCosts {
        self.gaps
    }

    /// Score a pair under the configured strategy.
    ///
    /// Returns `Ok(None)` when the alignment strategy finds no positive-scoring
    /// local alignment.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::LengthMismatch` for unequal lengths under the
    /// positional strategy, `ScoringError::UnknownResidue` for residues missing
    /// from the matrix, or `ScoringError::EmptySequence`.
    pub fn score(&self, left: &str, right: &str) -> Result<Option<f64>, ScoringError> {
        match self.strategy {
            Strategy::Alignment => Ok(self.alignment_score(left, right)?.map(f64::from)),
            Strategy::Positional => self.positional_score(left, right).map(Some),
        }
    }

    /// Best local alignment score without traceback, in linear memory.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::UnknownResidue` or `ScoringError::EmptySequence`.
    pub fn alignment_score(&self, query: &str, subject: &str) -> Result<Option<i32>, ScoringError> {
        let q = self.encode(query)?;
        let s = self.encode(subject)?;
        let GapCosts { open, extend } = self.gaps;

        let n = s.len();
        let mut h_prev = vec![0i32; n + 1];
        let mut h_cur = vec![0i32; n + 1];
        // Best score ending in a gap in the subject, per column
        let mut f = vec![NEG_INF; n + 1];
        let mut best = 0;

        for &qi in &q {
            // Best score ending in a gap in the query, along this row
            let mut e = NEG_INF;
            h_cur[0] = 0;
            for j in 1..=n {
                e = (h_cur[j - 1] + open).max(e + extend);
                f[j] = (h_prev[j] + open).max(f[j] + extend);
                let diag = h_prev[j - 1] + self.matrix.score_at(qi, s[j - 1]);
                let h = diag.max(e).max(f[j]).max(0);
                h_cur[j] = h;
                best = best.max(h);
            }
            std::mem::swap(&mut h_prev, &mut h_cur);
        }

        Ok((best > 0).then_some(best))
    }

    /// Best local alignment with traceback (Smith-Waterman with affine gaps).
    ///
    /// A gap of length k scores `open + (k - 1) * extend`. Ties between
    /// equally-scoring end cells resolve to the first cell in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::UnknownResidue` or `ScoringError::EmptySequence`.
    pub fn align(&self, query: &str, subject: &str) -> Result<Option<LocalAlignment>, ScoringError> {
        let q = self.encode(query)?;
        let s = self.encode(subject)?;
        let GapCosts { open, extend } = self.gaps;

        let rows = q.len() + 1;
        let cols = s.len() + 1;
        let idx = |i: usize, j: usize| i * cols + j;

        let mut h = vec![0i32; rows * cols];
        let mut e = vec![NEG_INF; rows * cols];
        let mut f = vec![NEG_INF; rows * cols];

        let mut best = 0;
        let mut best_i = 0;
        let mut best_j = 0;

        for i in 1..rows {
            for j in 1..cols {
                e[idx(i, j)] = (h[idx(i, j - 1)] + open).max(e[idx(i, j - 1)] + extend);
                f[idx(i, j)] = (h[idx(i - 1, j)] + open).max(f[idx(i - 1, j)] + extend);
                let diag = h[idx(i - 1, j - 1)] + self.matrix.score_at(q[i - 1], s[j - 1]);
                let score = diag.max(e[idx(i, j)]).max(f[idx(i, j)]).max(0);
                h[idx(i, j)] = score;
                if score > best {
                    best = score;
                    best_i = i;
                    best_j = j;
                }
            }
        }

        if best == 0 {
            return Ok(None);
        }

        #[derive(Clone, Copy, PartialEq)]
        enum State {
            H,
            E,
            F,
        }

        let query = query.as_bytes();
        let subject = subject.as_bytes();
        let mut aligned_query = Vec::new();
        let mut aligned_subject = Vec::new();
        let mut markup = Vec::new();

        let mut i = best_i;
        let mut j = best_j;
        let mut state = State::H;

        loop {
            match state {
                State::H => {
                    if i == 0 || j == 0 || h[idx(i, j)] == 0 {
                        break;
                    }
                    let diag = h[idx(i - 1, j - 1)] + self.matrix.score_at(q[i - 1], s[j - 1]);
                    if h[idx(i, j)] == diag {
                        let a = query[i - 1].to_ascii_uppercase();
                        let b = subject[j - 1].to_ascii_uppercase();
                        aligned_query.push(a);
                        aligned_subject.push(b);
                        markup.push(if a == b { b'|' } else { b'.' });
                        i -= 1;
                        j -= 1;
                    } else if h[idx(i, j)] == e[idx(i, j)] {
                        state = State::E;
                    } else {
                        state = State::F;
                    }
                }
                State::E => {
                    aligned_query.push(b'-');
                    aligned_subject.push(subject[j - 1].to_ascii_uppercase());
                    markup.push(b'-');
                    if e[idx(i, j)] == h[idx(i, j - 1)] + open {
                        state = State::H;
                    }
                    j -= 1;
                }
                State::F => {
                    aligned_query.push(query[i - 1].to_ascii_uppercase());
                    aligned_subject.push(b'-');
                    markup.push(b'-');
                    if f[idx(i, j)] == h[idx(i - 1, j)] + open {
                        state = State::H;
                    }
                    i -= 1;
                }
            }
        }

        aligned_query.reverse();
        aligned_subject.reverse();
        markup.reverse();

        Ok(Some(LocalAlignment {
            score: best,
            aligned_query: String::from_utf8_lossy(&aligned_query).into_owned(),
            aligned_subject: String::from_utf8_lossy(&aligned_subject).into_owned(),
            markup: String::from_utf8_lossy(&markup).into_owned(),
            query_start: i,
            query_end: best_i,
            subject_start: j,
            subject_end: best_j,
        }))
    }

    /// Mean per-position substitution score of two equal-length motifs.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::LengthMismatch` if the lengths differ,
    /// `ScoringError::UnknownResidue` or `ScoringError::EmptySequence`.
    pub fn positional_score(&self, left: &str, right: &str) -> Result<f64, ScoringError> {
        if left.len() != right.len() {
            return Err(ScoringError::LengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        let l = self.encode(left)?;
        let r = self.encode(right)?;

        let total: i64 = l
            .iter()
            .zip(&r)
            .map(|(&a, &b)| i64::from(self.matrix.score_at(a, b)))
            .sum();

        #[allow(clippy::cast_precision_loss)] // motif widths are tiny
        let mean = total as f64 / l.len() as f64;
        Ok(mean)
    }

    /// Map residues to matrix row indices
    fn encode(&self, sequence: &str) -> Result<Vec<usize>, ScoringError> {
        if sequence.is_empty() {
            return Err(ScoringError::EmptySequence);
        }
        sequence
            .bytes()
            .map(|b| {
                self.matrix
                    .index_of(b)
                    .ok_or_else(|| ScoringError::UnknownResidue {
                        residue: char::from(b),
                        sequence: sequence.to_string(),
                        matrix: self.matrix.name().to_string(),
                    })
            })
            .collect()
    }
}
