//! Analysis driver
//!
//! Runs the consensus and, when configured, the similarity profile on a
//! dedicated rayon pool and gathers everything into one report.

use tracing::{info, info_span, warn};

use super::alignment::AlignedSequenceSet;
use super::consensus::ConsensusCalculator;
use super::matrix::ScoringMatrix;
use super::profile::SimilarityProfileCalculator;
use super::types::ConsensusReport;
use crate::config::RunConfig;

/// Run the complete analysis for a prepared set and matrix
pub fn run_analysis(
    set: &AlignedSequenceSet,
    matrix: &ScoringMatrix,
    config: &RunConfig,
) -> ConsensusReport {
    let num_threads = config.threads.get_count();

    let analyze = || {
        let params = config.consensus.resolve(set);

        let mut consensus = info_span!("consensus", matrix = matrix.name())
            .in_scope(|| ConsensusCalculator::new(matrix, params).compute(set));
        if let Some(name) = &config.consensus_name {
            consensus.name = name.clone();
        }

        let profile = config.profile.map(|profile_params| {
            info_span!("profile", window = profile_params.window_size)
                .in_scope(|| SimilarityProfileCalculator::new(matrix, profile_params).compute(set))
        });

        ConsensusReport {
            matrix: matrix.name().to_string(),
            sequence_count: set.len(),
            column_count: set.column_count(),
            params,
            consensus,
            profile,
        }
    };

    let report = match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
    {
        Ok(pool) => pool.install(analyze),
        Err(e) => {
            warn!("could not build a {}-thread pool ({}); using the global pool", num_threads, e);
            analyze()
        }
    };

    info!(
        sequences = report.sequence_count,
        columns = report.column_count,
        threads = num_threads,
        "analysis complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fasta::parse_alignment;
    use crate::analysis::types::{ProfileParams, ThreadCount};

    #[test]
    fn test_run_analysis() {
        let fasta = ">Seq1\nACGTACGT\n>Seq2\nACGTACGT\n>Seq3\nACGAACGT";
        let mut set = parse_alignment(fasta).unwrap();
        let config = RunConfig {
            profile: Some(ProfileParams { window_size: 3 }),
            threads: ThreadCount::Fixed(2),
            ..Default::default()
        };
        let matrix = config.prepare(&mut set).unwrap();

        let report = run_analysis(&set, &matrix, &config);
        assert_eq!(report.matrix, "EDNAFULL");
        assert_eq!(report.sequence_count, 3);
        assert_eq!(report.column_count, 8);
        assert_eq!(report.params.plurality, 1.5);
        // Column 4 has one T backed only by the other T
        assert_eq!(report.consensus.residues, "ACG-ACGT");
        let profile = report.profile.unwrap();
        assert_eq!(profile.len(), 8);
        assert_eq!(profile.window_size, 3);
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let mut set = parse_alignment(">a\nMHQWKLA-\n>b\nMHRWKLAV\n>c\nMHQW-LSV\n").unwrap();
        let base = RunConfig {
            profile: Some(ProfileParams { window_size: 2 }),
            ..Default::default()
        };
        let matrix = base.prepare(&mut set).unwrap();

        let single = run_analysis(
            &set,
            &matrix,
            &RunConfig {
                threads: ThreadCount::Fixed(1),
                ..base.clone()
            },
        );
        let multi = run_analysis(
            &set,
            &matrix,
            &RunConfig {
                threads: ThreadCount::Fixed(4),
                ..base
            },
        );
        assert_eq!(single, multi);
    }

    #[test]
    fn test_custom_consensus_name_and_json() {
        let mut set = parse_alignment(">a\nAC\n>b\nAC\n").unwrap();
        let config = RunConfig {
            consensus_name: Some("cons".to_string()),
            ..Default::default()
        };
        let matrix = config.prepare(&mut set).unwrap();
        let report = run_analysis(&set, &matrix, &config);
        assert_eq!(report.consensus.name, "cons");
        assert_eq!(report.consensus.residues, "ac");
        assert!(report.profile.is_none());

        let json = report.to_json_pretty().unwrap();
        let back: ConsensusReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
