//! Data types for consensus and similarity analysis

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::alignment::AlignedSequenceSet;
use crate::error::Result;

/// Name given to computed consensus sequences unless overridden
pub const CONSENSUS_NAME: &str = "Consensus";

/// Default similarity profile window, in columns
pub const DEFAULT_WINDOW: usize = 10;

/// Thread count configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadCount {
    /// Use all available CPU cores
    Auto,
    /// Use a specific number of threads
    Fixed(usize),
}

impl Default for ThreadCount {
    fn default() -> Self {
        Self::Auto
    }
}

impl ThreadCount {
    /// Get the actual number of threads to use
    pub fn get_count(&self) -> usize {
        match self {
            Self::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            Self::Fixed(n) => (*n).max(1),
        }
    }
}

/// Resolved consensus thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Minimum positive-match weight for a column to get a consensus residue
    pub plurality: f64,
    /// Positive-match weight at or below which the residue is lower-cased
    pub case_threshold: f64,
    /// Minimum number of identical residues required (0 disables the check)
    pub min_identity: usize,
}

impl ConsensusParams {
    /// Thresholds at half the total weight of `set`, identity check off.
    pub fn for_set(set: &AlignedSequenceSet) -> Self {
        ConsensusOptions::default().resolve(set)
    }
}

/// Consensus thresholds as given by a user; missing values depend on the set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusOptions {
    pub plurality: Option<f64>,
    pub case_threshold: Option<f64>,
    pub min_identity: Option<usize>,
}

impl ConsensusOptions {
    pub fn resolve(&self, set: &AlignedSequenceSet) -> ConsensusParams {
        let half_weight = set.total_weight() / 2.0;
        ConsensusParams {
            plurality: self.plurality.unwrap_or(half_weight),
            case_threshold: self.case_threshold.unwrap_or(half_weight),
            min_identity: self.min_identity.unwrap_or(0),
        }
    }
}

/// Similarity profile settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileParams {
    pub window_size: usize,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW,
        }
    }
}

impl ProfileParams {
    /// Window actually used; a zero window behaves as a single column.
    pub fn effective_window(&self) -> usize {
        self.window_size.max(1)
    }
}

/// A computed consensus sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub name: String,
    pub residues: String,
}

impl ConsensusResult {
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// FASTA text with residues wrapped at `line_width` (0 disables wrapping).
    pub fn to_fasta(&self, line_width: usize) -> String {
        let mut out = format!(">{}\n", self.name);
        if line_width == 0 {
            out.push_str(&self.residues);
            out.push('\n');
            return out;
        }
        for chunk in self.residues.as_bytes().chunks(line_width) {
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
        out
    }
}

/// Normalized windowed similarity, one value per alignment column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityProfile {
    pub window_size: usize,
    pub scores: Vec<f64>,
}

impl SimilarityProfile {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// (min, max) over all bins, for plot axis scaling
    pub fn range(&self) -> Option<(f64, f64)> {
        let first = *self.scores.first()?;
        Some(
            self.scores
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }
}

/// Complete analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub matrix: String,
    pub sequence_count: usize,
    pub column_count: usize,
    pub params: ConsensusParams,
    pub consensus: ConsensusResult,
    pub profile: Option<SimilarityProfile>,
}

impl ConsensusReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
