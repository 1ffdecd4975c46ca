//! Aligned sequence records and the ordered set the calculators read from

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::residues::{looks_like_protein, PAD};
use crate::error::{ConsError, Result};

/// One row of an alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSequenceRecord {
    pub name: String,
    /// Gapped residues; case is preserved
    pub residues: String,
    pub weight: f64,
    pub is_protein: bool,
}

impl AlignedSequenceRecord {
    /// New record with weight 1.0 and the sequence type guessed from the residues.
    pub fn new(name: impl Into<String>, residues: impl Into<String>) -> Self {
        let residues = residues.into();
        let is_protein = looks_like_protein(&residues);
        Self {
            name: name.into(),
            residues,
            weight: 1.0,
            is_protein,
        }
    }

    /// Set the weight; it must be finite and not negative.
    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        check_weight(&self.name, weight)?;
        self.weight = weight;
        Ok(self)
    }

    pub fn with_protein(mut self, is_protein: bool) -> Self {
        self.is_protein = is_protein;
        self
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residue at `column`, or a gap past the end of the sequence.
    #[inline]
    pub fn residue_at(&self, column: usize) -> u8 {
        self.residues.as_bytes().get(column).copied().unwrap_or(PAD)
    }
}

/// Ordered collection of aligned records.
///
/// Order is significant: tie-breaks in the consensus prefer earlier records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSequenceSet {
    records: Vec<AlignedSequenceRecord>,
}

impl AlignedSequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<AlignedSequenceRecord>) -> Self {
        Self { records }
    }

    /// Build a set of unit-weight records named `Sequence_1`, `Sequence_2`, ...
    pub fn from_strs(residues: &[&str]) -> Self {
        let records = residues
            .iter()
            .enumerate()
            .map(|(i, r)| AlignedSequenceRecord::new(format!("Sequence_{}", i + 1), *r))
            .collect();
        Self { records }
    }

    pub fn push(&mut self, record: AlignedSequenceRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[AlignedSequenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Length of the longest record
    pub fn column_count(&self) -> usize {
        self.records.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Residues of every record at `column`, in set order
    pub fn column(&self, column: usize) -> Vec<u8> {
        self.records.iter().map(|r| r.residue_at(column)).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.weight).collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.records.iter().map(|r| r.weight).sum()
    }

    /// A set is protein when its first record is.
    pub fn is_protein(&self) -> bool {
        self.records.first().map(|r| r.is_protein).unwrap_or(false)
    }

    /// Force every record to one sequence type.
    pub fn set_protein(&mut self, is_protein: bool) {
        for record in &mut self.records {
            record.is_protein = is_protein;
        }
    }

    /// Override record weights by name. Names not in the set are ignored.
    pub fn apply_weights(&mut self, weights: &HashMap<String, f64>) -> Result<()> {
        for (name, &weight) in weights {
            check_weight(name, weight)?;
        }
        for record in &mut self.records {
            if let Some(&weight) = weights.get(&record.name) {
                record.weight = weight;
            }
        }
        Ok(())
    }
}

fn check_weight(name: &str, weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ConsError::invalid_input(format!(
            "weight for '{}' must be a finite value >= 0, got {}",
            name, weight
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_column_access() {
        let set = AlignedSequenceSet::from_strs(&["ACGT", "AC", "ACGTTT"]);
        assert_eq!(set.column_count(), 6);
        assert_eq!(set.column(1), b"CCC".to_vec());
        assert_eq!(set.column(3), b"T-T".to_vec());
        assert_eq!(set.column(5), b"--T".to_vec());
    }

    #[test]
    fn test_empty_set() {
        let set = AlignedSequenceSet::new();
        assert_eq!(set.column_count(), 0);
        assert!(!set.is_protein());
        assert_eq!(set.total_weight(), 0.0);
    }

    #[test]
    fn test_apply_weights() {
        let mut set = AlignedSequenceSet::from_strs(&["AC", "AG"]);
        let mut weights = HashMap::new();
        weights.insert("Sequence_2".to_string(), 2.5);
        weights.insert("missing".to_string(), 9.0);
        set.apply_weights(&weights).unwrap();
        assert_eq!(set.weights(), vec![1.0, 2.5]);
        assert_eq!(set.total_weight(), 3.5);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut set = AlignedSequenceSet::from_strs(&["AC"]);
        let mut weights = HashMap::new();
        weights.insert("Sequence_1".to_string(), -1.0);
        assert!(set.apply_weights(&weights).is_err());
        assert_eq!(set.weights(), vec![1.0]);
    }

    #[test]
    fn test_with_weight_validates() {
        let record = AlignedSequenceRecord::new("s", "AC").with_weight(0.0).unwrap();
        assert_eq!(record.weight, 0.0);
        assert!(AlignedSequenceRecord::new("s", "AC").with_weight(-0.5).is_err());
        assert!(AlignedSequenceRecord::new("s", "AC").with_weight(f64::NAN).is_err());
        assert!(AlignedSequenceRecord::new("s", "AC")
            .with_weight(f64::INFINITY)
            .is_err());
    }

    #[test]
    fn test_sequence_type_from_first_record() {
        let set = AlignedSequenceSet::from_strs(&["MHQWK", "ACGTA"]);
        assert!(set.is_protein());
        let set = AlignedSequenceSet::from_strs(&["ACGTA", "MHQWK"]);
        assert!(!set.is_protein());
    }
}
