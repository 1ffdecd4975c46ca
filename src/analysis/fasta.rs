//! FASTA input for aligned sequence sets

use bio::io::fasta;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::alignment::{AlignedSequenceRecord, AlignedSequenceSet};
use crate::error::{ConsError, Result};

/// Parse aligned FASTA text into a sequence set.
///
/// Gaps and residue case are kept as written. Text without any `>` header is
/// read as one sequence per non-empty line.
pub fn parse_alignment(text: &str) -> Result<AlignedSequenceSet> {
    let set = if text.trim_start().starts_with('>') {
        parse_fasta_records(text)?
    } else {
        parse_plain_lines(text)
    };

    if set.is_empty() {
        return Err(ConsError::invalid_input("no sequences found in alignment input"));
    }

    debug!(
        sequences = set.len(),
        columns = set.column_count(),
        protein = set.is_protein(),
        "alignment loaded"
    );
    Ok(set)
}

/// Read and parse an aligned FASTA file.
pub fn read_alignment(path: impl AsRef<Path>) -> Result<AlignedSequenceSet> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_alignment(&text)
}

fn parse_fasta_records(text: &str) -> Result<AlignedSequenceSet> {
    let reader = fasta::Reader::new(text.as_bytes());
    let mut set = AlignedSequenceSet::new();

    for result in reader.records() {
        let record = result.map_err(|e| ConsError::invalid_input(format!("FASTA: {}", e)))?;
        let seq = record.seq();
        if !seq.is_ascii() {
            return Err(ConsError::invalid_input(format!(
                "sequence '{}' contains non-ASCII residues",
                record.id()
            )));
        }

        let name = if record.id().is_empty() {
            format!("Sequence_{}", set.len() + 1)
        } else {
            record.id().to_string()
        };
        let residues: String = seq
            .iter()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|&b| b as char)
            .collect();

        set.push(AlignedSequenceRecord::new(name, residues));
    }

    Ok(set)
}

fn parse_plain_lines(text: &str) -> AlignedSequenceSet {
    let mut set = AlignedSequenceSet::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let residues: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        let name = format!("Sequence_{}", set.len() + 1);
        set.push(AlignedSequenceRecord::new(name, residues));
    }
    set
}
