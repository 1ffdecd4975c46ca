//! Substitution matrix loading and lookup
//!
//! Matrices use the EMBOSS text layout: `#` comments, a header row of column
//! symbols, then one row per symbol holding the row symbol and its scores.
//! Tokens may be separated by whitespace, tabs or colons.

use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::residues::{is_matrix_gap, WILDCARD};
use crate::error::{ConsError, Result};

/// Names of the matrices compiled into the crate
pub const BUILTIN_MATRICES: [&str; 2] = ["EBLOSUM62", "EDNAFULL"];

static EBLOSUM62: Lazy<ScoringMatrix> =
    Lazy::new(|| ScoringMatrix::parse("EBLOSUM62", include_str!("../../data/EBLOSUM62")));

static EDNAFULL: Lazy<ScoringMatrix> =
    Lazy::new(|| ScoringMatrix::parse("EDNAFULL", include_str!("../../data/EDNAFULL")));

/// A square symbol-by-symbol score table.
///
/// Immutable once built. Symbol lookup is case-insensitive.
#[derive(Debug, Clone)]
pub struct ScoringMatrix {
    name: String,
    dimension: usize,
    /// Row-major `dimension * dimension` scores
    scores: Vec<i32>,
    /// Header symbols in index order (uppercase)
    symbols: Vec<u8>,
    /// Uppercase byte -> row/column index
    lookup: [Option<usize>; 256],
}

/// Result of the two-pass read, before deciding strict vs lenient handling
struct RawMatrix {
    dimension: usize,
    scores: Vec<i32>,
    symbols: Vec<u8>,
    error: Option<ConsError>,
}

impl ScoringMatrix {
    /// Parse matrix text, degrading to an all-zero score table on malformed rows.
    ///
    /// The header symbols are still indexed in the degraded case, so lookups
    /// keep working and every score reads as 0.
    pub fn parse(name: &str, text: &str) -> Self {
        let mut raw = read_matrix_text(text);
        if let Some(err) = raw.error.take() {
            warn!(
                matrix = name,
                dimension = raw.dimension,
                "{}; using a zero-filled matrix",
                err
            );
            raw.scores.iter_mut().for_each(|s| *s = 0);
        }
        Self::from_raw(name, raw)
    }

    /// Parse matrix text, rejecting anything the lenient parser would zero out.
    pub fn try_parse(name: &str, text: &str) -> Result<Self> {
        let mut raw = read_matrix_text(text);
        match raw.error.take() {
            Some(err) => Err(err),
            None => Ok(Self::from_raw(name, raw)),
        }
    }

    /// Read and leniently parse a matrix file. The file name becomes the matrix name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::parse(&name, &text))
    }

    /// Look up a compiled-in matrix by name (case-insensitive).
    pub fn builtin(name: &str) -> Result<&'static ScoringMatrix> {
        match name.to_ascii_uppercase().as_str() {
            "EBLOSUM62" => Ok(&*EBLOSUM62),
            "EDNAFULL" => Ok(&*EDNAFULL),
            _ => Err(ConsError::UnknownMatrix(name.to_string())),
        }
    }

    /// Resolve a built-in name first, then fall back to a file path.
    pub fn load(name_or_path: &str) -> Result<Self> {
        if let Ok(matrix) = Self::builtin(name_or_path) {
            return Ok(matrix.clone());
        }
        let path = Path::new(name_or_path);
        if path.is_file() {
            return Self::from_path(path);
        }
        Err(ConsError::UnknownMatrix(name_or_path.to_string()))
    }

    /// The default matrix for a sequence type: EBLOSUM62 or EDNAFULL.
    pub fn default_for(is_protein: bool) -> &'static ScoringMatrix {
        if is_protein {
            &*EBLOSUM62
        } else {
            &*EDNAFULL
        }
    }

    /// Build a simple identity-style matrix over `symbols`.
    pub fn match_mismatch(name: &str, symbols: &str, match_score: i32, mismatch_score: i32) -> Self {
        let symbols: Vec<u8> = symbols
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|b| b.to_ascii_uppercase())
            .collect();
        let dimension = symbols.len();
        let mut scores = vec![mismatch_score; dimension * dimension];
        for i in 0..dimension {
            scores[i * dimension + i] = match_score;
        }
        Self::from_raw(
            name,
            RawMatrix {
                dimension,
                scores,
                symbols,
                error: None,
            },
        )
    }

    fn from_raw(name: &str, raw: RawMatrix) -> Self {
        let RawMatrix {
            dimension,
            scores,
            mut symbols,
            ..
        } = raw;
        symbols.truncate(dimension);

        let mut lookup = [None; 256];
        for (i, &s) in symbols.iter().enumerate() {
            lookup[s.to_ascii_uppercase() as usize] = Some(i);
        }

        debug!(matrix = name, dimension, "scoring matrix ready");

        Self {
            name: name.to_string(),
            dimension,
            scores,
            symbols,
            lookup,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows (equal to the number of columns)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Header symbols in index order
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Index of a residue symbol.
    ///
    /// Gap characters (`-`, `.`, `~`) with no row of their own are looked up
    /// as the wildcard `X`. Returns `None` when neither resolves.
    #[inline]
    pub fn index(&self, symbol: u8) -> Option<usize> {
        let upper = symbol.to_ascii_uppercase();
        match self.lookup[upper as usize] {
            Some(i) => Some(i),
            None if is_matrix_gap(symbol) => self.lookup[WILDCARD as usize],
            None => None,
        }
    }

    /// Score for a pair of indices previously returned by [`Self::index`].
    #[inline]
    pub fn score(&self, i: usize, j: usize) -> i32 {
        self.scores[i * self.dimension + j]
    }

    /// Score two residues directly; `None` if either has no index.
    pub fn score_residues(&self, a: u8, b: u8) -> Option<i32> {
        Some(self.score(self.index(a)?, self.index(b)?))
    }
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ':')
        .filter(|t| !t.is_empty())
}

/// A digit anywhere on the line marks it as a score row.
fn is_numeric_line(line: &str) -> bool {
    line.bytes().any(|b| b.is_ascii_digit())
}

fn is_content_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

fn read_matrix_text(text: &str) -> RawMatrix {
    let dimension = text
        .lines()
        .filter(|l| is_content_line(l) && is_numeric_line(l))
        .count();

    let mut scores = vec![0i32; dimension * dimension];
    let mut header: Option<Vec<u8>> = None;
    let mut error: Option<ConsError> = None;
    let mut row = 0usize;

    for (line_idx, line) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        if !is_content_line(line) {
            continue;
        }

        if !is_numeric_line(line) {
            if header.is_none() {
                header = Some(
                    tokens(line)
                        .filter_map(|t| t.bytes().next())
                        .map(|b| b.to_ascii_uppercase())
                        .collect(),
                );
            }
            continue;
        }

        let mut values = tokens(line).peekable();
        if let Some(first) = values.peek() {
            if first.parse::<i32>().is_err() && !first.bytes().any(|b| b.is_ascii_digit()) {
                values.next();
            }
        }

        let mut col = 0usize;
        for token in values {
            match token.parse::<i32>() {
                Ok(v) if col < dimension => scores[row * dimension + col] = v,
                Ok(_) => {
                    error.get_or_insert_with(|| {
                        ConsError::matrix_parse(
                            line_no,
                            format!("more than {} scores in row", dimension),
                        )
                    });
                }
                Err(_) => {
                    error.get_or_insert_with(|| {
                        ConsError::matrix_parse(line_no, format!("invalid score '{}'", token))
                    });
                }
            }
            col += 1;
        }
        if col < dimension {
            error.get_or_insert_with(|| {
                ConsError::matrix_parse(
                    line_no,
                    format!("expected {} scores, found {}", dimension, col),
                )
            });
        }
        row += 1;
    }

    let symbols = header.unwrap_or_default();
    if dimension == 0 {
        error.get_or_insert_with(|| ConsError::matrix_parse(0, "no score rows found"));
    } else if symbols.len() != dimension {
        error.get_or_insert_with(|| {
            ConsError::matrix_parse(
                0,
                format!(
                    "header has {} symbols but {} score rows",
                    symbols.len(),
                    dimension
                ),
            )
        });
    }

    RawMatrix {
        dimension,
        scores,
        symbols,
        error,
    }
}
