//! Sliding-window similarity profile
//!
//! Sums the pairwise column scores over a trailing window and stores the
//! total at the window centre, normalized by the number of ordered sequence
//! pairs and the square of the window width.

use rayon::prelude::*;
use tracing::debug;

use super::alignment::AlignedSequenceSet;
use super::matrix::ScoringMatrix;
use super::pairwise::{column_indices, column_pair_scores};
use super::types::{ProfileParams, SimilarityProfile};

/// Computes similarity profiles against one matrix
#[derive(Debug, Clone, Copy)]
pub struct SimilarityProfileCalculator<'a> {
    matrix: &'a ScoringMatrix,
    params: ProfileParams,
}

impl<'a> SimilarityProfileCalculator<'a> {
    pub fn new(matrix: &'a ScoringMatrix, params: ProfileParams) -> Self {
        Self { matrix, params }
    }

    /// One normalized value per column of `set`.
    ///
    /// Columns no window is centred on stay at 0. Sets with fewer than two
    /// sequences have no pairs and give an all-zero profile.
    pub fn compute(&self, set: &AlignedSequenceSet) -> SimilarityProfile {
        let window = self.params.effective_window();
        let columns = set.column_count();
        let n = set.len();
        let mut scores = vec![0.0f64; columns];

        debug!(sequences = n, columns, window, "computing similarity profile");

        if n < 2 || columns < window {
            return SimilarityProfile {
                window_size: window,
                scores,
            };
        }

        let totals = self.column_totals(set);

        for k in (window - 1)..columns {
            let low = k + 1 - window;
            let sum: f64 = totals[low..=k].iter().sum();
            scores[low + window / 2] = sum;
        }

        let norm = (n * (n - 1) * window * window) as f64;
        scores.iter_mut().for_each(|s| *s /= norm);

        SimilarityProfile {
            window_size: window,
            scores,
        }
    }

    /// Sum of every sequence's pairwise score, per column
    fn column_totals(&self, set: &AlignedSequenceSet) -> Vec<f64> {
        let weights = set.weights();
        (0..set.column_count())
            .into_par_iter()
            .map(|k| {
                let indices = column_indices(self.matrix, &set.column(k));
                column_pair_scores(self.matrix, &indices, &weights)
                    .iter()
                    .sum::<f64>()
            })
            .collect()
    }
}

/// Convenience wrapper around [`SimilarityProfileCalculator::compute`].
pub fn compute_profile(
    set: &AlignedSequenceSet,
    matrix: &ScoringMatrix,
    params: ProfileParams,
) -> SimilarityProfile {
    SimilarityProfileCalculator::new(matrix, params).compute(set)
}
