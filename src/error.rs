//! Error types shared by the matrix loader, sequence input and run configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the I/O and configuration layers.
///
/// The calculators themselves never fail: unknown symbols contribute nothing
/// and empty inputs give empty results.
#[derive(Error, Debug)]
pub enum ConsError {
    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors for configs and reports
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Scoring matrix text that the strict parser rejects
    #[error("Matrix parse error at line {line}: {message}")]
    MatrixParse { line: usize, message: String },

    /// Name that is neither a built-in matrix nor an existing file
    #[error("Unknown scoring matrix: {0}")]
    UnknownMatrix(String),

    /// Invalid sequence data or weights
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration file problems
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

/// Type alias for Results using ConsError
pub type Result<T> = std::result::Result<T, ConsError>;

impl ConsError {
    pub fn matrix_parse(line: usize, message: impl Into<String>) -> Self {
        Self::MatrixParse {
            line,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
