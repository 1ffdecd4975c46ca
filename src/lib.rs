//! MSA Consensus - alignment consensus and similarity profiles
//!
//! Computes a weighted per-column consensus sequence and a windowed
//! pairwise-similarity profile for a multiple sequence alignment, scored
//! against a substitution matrix.

pub mod analysis;
pub mod config;
pub mod error;

pub use analysis::*;
pub use config::RunConfig;
pub use error::{ConsError, Result};
