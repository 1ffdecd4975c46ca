//! Pairwise scoring of the residues in one alignment column
//!
//! Every sequence is scored against every other sequence in the column using
//! the substitution matrix, weighted by the partner's weight. Both the
//! consensus and the similarity profile are built on these per-sequence sums.

use super::matrix::ScoringMatrix;

/// Matrix index of each residue in a column (`None` for symbols with no row)
pub fn column_indices(matrix: &ScoringMatrix, residues: &[u8]) -> Vec<Option<usize>> {
    residues.iter().map(|&r| matrix.index(r)).collect()
}

/// Weighted agreement of each sequence with all others in the column.
///
/// For every pair `i < j` with both indices valid, adds `score * weight[j]`
/// to sequence `i` and `score * weight[i]` to sequence `j`. Unresolvable
/// residues contribute nothing.
pub fn column_pair_scores(
    matrix: &ScoringMatrix,
    indices: &[Option<usize>],
    weights: &[f64],
) -> Vec<f64> {
    let n = indices.len();
    let mut scores = vec![0.0f64; n];

    for i in 0..n {
        let Some(m1) = indices[i] else { continue };
        for j in (i + 1)..n {
            let Some(m2) = indices[j] else { continue };
            let s = matrix.score(m1, m2) as f64;
            scores[i] += s * weights[j];
            scores[j] += s * weights[i];
        }
    }

    scores
}
