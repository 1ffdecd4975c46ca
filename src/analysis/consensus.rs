//! Weighted consensus calling
//!
//! Each column is resolved independently:
//! 1. pairwise weighted scores pick the sequence that agrees best with the rest
//! 2. its residue is kept only if enough weight matches it positively
//! 3. weakly supported residues are lower-cased
//! 4. an optional identity count can still veto the column

use rayon::prelude::*;
use tracing::debug;

use super::alignment::AlignedSequenceSet;
use super::matrix::ScoringMatrix;
use super::pairwise::{column_indices, column_pair_scores};
use super::residues::{is_gap, placeholder};
use super::types::{ConsensusParams, ConsensusResult, CONSENSUS_NAME};

/// Computes consensus sequences against one matrix with fixed thresholds
#[derive(Debug, Clone, Copy)]
pub struct ConsensusCalculator<'a> {
    matrix: &'a ScoringMatrix,
    params: ConsensusParams,
}

/// Per-symbol support within one column, indexed by matrix index
struct SymbolSupport {
    /// Weight of sequences carrying the symbol
    identical: Vec<f64>,
    /// Weight of the other sequences scoring positively against the symbol
    matching: Vec<f64>,
}

impl<'a> ConsensusCalculator<'a> {
    pub fn new(matrix: &'a ScoringMatrix, params: ConsensusParams) -> Self {
        Self { matrix, params }
    }

    /// Consensus over every column of `set`.
    ///
    /// Columns are evaluated in parallel on the current rayon pool; the
    /// result does not depend on the number of threads.
    pub fn compute(&self, set: &AlignedSequenceSet) -> ConsensusResult {
        let columns = set.column_count();
        let weights = set.weights();
        let fill = placeholder(set.is_protein());

        debug!(
            sequences = set.len(),
            columns,
            plurality = self.params.plurality,
            case_threshold = self.params.case_threshold,
            min_identity = self.params.min_identity,
            "computing consensus"
        );

        let symbols: Vec<u8> = (0..columns)
            .into_par_iter()
            .map(|k| self.column_symbol(&set.column(k), &weights, fill))
            .collect();

        ConsensusResult {
            name: CONSENSUS_NAME.to_string(),
            residues: symbols.into_iter().map(char::from).collect(),
        }
    }

    /// Consensus symbol for a single column of residues.
    ///
    /// `weights` holds one weight per residue, in the same order.
    pub fn column_symbol(&self, residues: &[u8], weights: &[f64], fill: u8) -> u8 {
        debug_assert_eq!(residues.len(), weights.len());
        if residues.is_empty() {
            return fill;
        }

        let indices = column_indices(self.matrix, residues);
        let pair_scores = column_pair_scores(self.matrix, &indices, weights);

        let high = best_agreement(residues, &pair_scores);
        let support = self.symbol_support(&indices, weights);

        let winner = residues[high];
        let winner_matching = indices[high]
            .map(|m| support.matching[m])
            .unwrap_or(0.0);

        let mut symbol = if winner_matching >= self.params.plurality && !is_gap(winner) {
            if winner_matching <= self.params.case_threshold {
                winner.to_ascii_lowercase()
            } else {
                winner.to_ascii_uppercase()
            }
        } else {
            fill
        };

        if self.params.min_identity > 0
            && identity_count(residues, &indices, &support) < self.params.min_identity
        {
            symbol = fill;
        }

        symbol
    }

    fn symbol_support(&self, indices: &[Option<usize>], weights: &[f64]) -> SymbolSupport {
        let dimension = self.matrix.dimension();
        let mut identical = vec![0.0f64; dimension];
        let mut matching = vec![0.0f64; dimension];
        // First sequence carrying each symbol; it never supports itself
        let mut carrier: Vec<Option<usize>> = vec![None; dimension];

        for (i, idx) in indices.iter().enumerate() {
            if let Some(m) = *idx {
                identical[m] += weights[i];
                carrier[m].get_or_insert(i);
            }
        }

        for (m1, first) in carrier.iter().enumerate() {
            let Some(first) = *first else { continue };
            for (j, idx) in indices.iter().enumerate() {
                if j == first {
                    continue;
                }
                if let Some(m2) = *idx {
                    if self.matrix.score(m1, m2) > 0 {
                        matching[m1] += weights[j];
                    }
                }
            }
        }

        SymbolSupport {
            identical,
            matching,
        }
    }
}

/// Index of the sequence with the highest pairwise score.
///
/// Ties keep the earlier sequence unless it holds a gap.
fn best_agreement(residues: &[u8], pair_scores: &[f64]) -> usize {
    let mut high = 0usize;
    for i in 1..pair_scores.len() {
        if pair_scores[i] > pair_scores[high]
            || (pair_scores[i] == pair_scores[high] && is_gap(residues[high]))
        {
            high = i;
        }
    }
    high
}

/// Number of non-gap sequences carrying the best supported symbol.
///
/// The best symbol has the largest matching weight; ties go to the larger
/// identical weight, then to the symbol seen first.
fn identity_count(residues: &[u8], indices: &[Option<usize>], support: &SymbolSupport) -> usize {
    let mut leader: Option<usize> = None;
    for (i, idx) in indices.iter().enumerate() {
        let Some(m) = *idx else { continue };
        if is_gap(residues[i]) {
            continue;
        }
        leader = match leader {
            None => Some(m),
            Some(best) => {
                let better = support.matching[m] > support.matching[best]
                    || (support.matching[m] == support.matching[best]
                        && support.identical[m] > support.identical[best]);
                if better {
                    Some(m)
                } else {
                    Some(best)
                }
            }
        };
    }

    let Some(leader) = leader else { return 0 };
    residues
        .iter()
        .zip(indices)
        .filter(|(r, idx)| !is_gap(**r) && **idx == Some(leader))
        .count()
}

/// Convenience wrapper around [`ConsensusCalculator::compute`].
pub fn compute_consensus(
    set: &AlignedSequenceSet,
    matrix: &ScoringMatrix,
    params: ConsensusParams,
) -> ConsensusResult {
    ConsensusCalculator::new(matrix, params).compute(set)
}
