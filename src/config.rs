//! # Run configuration
//!
//! A JSON document describing one consensus/profile run. Every field is
//! optional; command-line flags override whatever the file sets.
//!
//! ```json
//! {
//!   "matrix": "EBLOSUM62",
//!   "consensus": { "plurality": 2.0, "case_threshold": 1.0, "min_identity": 0 },
//!   "profile": { "window_size": 10 },
//!   "threads": { "Fixed": 4 },
//!   "weights": { "seq1": 2.0 },
//!   "protein": true,
//!   "consensus_name": "cons"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::analysis::{
    AlignedSequenceSet, ConsensusOptions, ProfileParams, ScoringMatrix, ThreadCount,
};
use crate::error::{ConsError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Built-in matrix name or matrix file path; defaults by sequence type
    pub matrix: Option<String>,
    pub consensus: ConsensusOptions,
    /// Similarity profile settings; no profile is computed when absent
    pub profile: Option<ProfileParams>,
    pub threads: ThreadCount,
    /// Per-sequence weights by record name
    pub weights: HashMap<String, f64>,
    /// Force the sequence type instead of guessing it from the residues
    pub protein: Option<bool>,
    /// Name for the consensus record (default "Consensus")
    pub consensus_name: Option<String>,
}

impl RunConfig {
    /// Load a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConsError::config(path, e.to_string()))?;
        config
            .validate()
            .map_err(|e| ConsError::config(path, e.to_string()))?;
        Ok(config)
    }

    /// Reject thresholds that can never compare sensibly.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("plurality", self.consensus.plurality),
            ("case_threshold", self.consensus.case_threshold),
        ];
        for (name, value) in thresholds {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ConsError::invalid_input(format!(
                        "{} must be a finite number, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }

    /// Apply weights and sequence type to `set`, then resolve the matrix.
    pub fn prepare(&self, set: &mut AlignedSequenceSet) -> Result<Cow<'static, ScoringMatrix>> {
        self.validate()?;
        if let Some(protein) = self.protein {
            set.set_protein(protein);
        }
        set.apply_weights(&self.weights)?;

        Ok(match &self.matrix {
            Some(name_or_path) => Cow::Owned(ScoringMatrix::load(name_or_path)?),
            None => Cow::Borrowed(ScoringMatrix::default_for(set.is_protein())),
        })
    }
}
