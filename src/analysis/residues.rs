//! Residue classification helpers: gaps, placeholders and sequence type

/// Wildcard symbol looked up for gap characters
pub const WILDCARD: u8 = b'X';

/// Residue reported for columns past the end of a ragged sequence
pub const PAD: u8 = b'-';

/// Consensus symbol for an undecided protein column
pub const PROTEIN_PLACEHOLDER: u8 = b'x';

/// Consensus symbol for an undecided nucleotide column
pub const NUCLEOTIDE_PLACEHOLDER: u8 = b'-';

/// Fraction of non-gap residues that must be nucleotide symbols
/// for a sequence to be classed as DNA/RNA
const NUCLEOTIDE_FRACTION: f64 = 0.9;

/// Check if a residue is an alignment gap
#[inline]
pub fn is_gap(c: u8) -> bool {
    matches!(c, b'-' | b'.')
}

/// Check if a residue is one of the gap characters a matrix remaps to its wildcard
#[inline]
pub fn is_matrix_gap(c: u8) -> bool {
    matches!(c, b'-' | b'.' | b'~')
}

/// Check if a character is a plain nucleotide (or the `N` unknown base)
#[inline]
pub fn is_nucleotide_symbol(c: u8) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        b'A' | b'C' | b'G' | b'T' | b'U' | b'N'
    )
}

/// Placeholder emitted when no consensus can be called
#[inline]
pub fn placeholder(is_protein: bool) -> u8 {
    if is_protein {
        PROTEIN_PLACEHOLDER
    } else {
        NUCLEOTIDE_PLACEHOLDER
    }
}

/// Guess whether a residue string is a protein.
///
/// Gaps and `~` are ignored. A string with no residues at all is treated as
/// nucleotide.
pub fn looks_like_protein(residues: &str) -> bool {
    let mut total = 0usize;
    let mut nucleotide = 0usize;
    for c in residues.bytes().filter(|&c| !is_matrix_gap(c)) {
        total += 1;
        if is_nucleotide_symbol(c) {
            nucleotide += 1;
        }
    }
    if total == 0 {
        return false;
    }
    (nucleotide as f64 / total as f64) < NUCLEOTIDE_FRACTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_classes() {
        assert!(is_gap(b'-'));
        assert!(is_gap(b'.'));
        assert!(!is_gap(b'~'));
        assert!(is_matrix_gap(b'~'));
        assert!(!is_gap(b'A'));
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder(true), b'x');
        assert_eq!(placeholder(false), b'-');
    }

    #[test]
    fn test_looks_like_protein() {
        assert!(!looks_like_protein("ACGT--acgu"));
        assert!(!looks_like_protein("ACGTNNNNAC"));
        assert!(looks_like_protein("MHQWERTYKL"));
        assert!(!looks_like_protein("----"));
        assert!(!looks_like_protein(""));
    }
}
