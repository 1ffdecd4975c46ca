use std::collections::HashMap;
use std::fs;

use msa_consensus::{
    read_alignment, run_analysis, ConsensusReport, ProfileParams, RunConfig, ScoringMatrix,
    ThreadCount,
};
use tempfile::TempDir;

const ALIGNMENT: &str = ">a\nACGTA\n>b\nACGTC\n>c first description\nACCTC\n";

const PLUS5_MINUS1: &str = "\
# simple match/mismatch matrix
   A  C  G  T
A  5 -1 -1 -1
C -1  5 -1 -1
G -1 -1  5 -1
T -1 -1 -1  5
";

fn write_inputs(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let fasta = dir.path().join("aln.fa");
    let matrix = dir.path().join("PLUS5");
    fs::write(&fasta, ALIGNMENT).unwrap();
    fs::write(&matrix, PLUS5_MINUS1).unwrap();
    (fasta, matrix)
}

#[test]
fn consensus_from_files_with_custom_matrix() {
    let dir = TempDir::new().unwrap();
    let (fasta, matrix_path) = write_inputs(&dir);

    let mut set = read_alignment(&fasta).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.records()[2].name, "c");
    assert!(!set.is_protein());

    let config = RunConfig {
        matrix: Some(matrix_path.to_string_lossy().into_owned()),
        threads: ThreadCount::Fixed(2),
        ..Default::default()
    };
    let matrix = config.prepare(&mut set).unwrap();
    assert_eq!(matrix.name(), "PLUS5");
    assert_eq!(matrix.dimension(), 4);

    let report = run_analysis(&set, &matrix, &config);
    assert_eq!(report.params.plurality, 1.5);
    // Two-of-three columns are backed by a single other sequence
    assert_eq!(report.consensus.residues, "AC-T-");
}

#[test]
fn weights_from_config_file_change_case() {
    let dir = TempDir::new().unwrap();
    let (fasta, matrix_path) = write_inputs(&dir);

    let mut weights = HashMap::new();
    weights.insert("c".to_string(), 2.0);
    let config = RunConfig {
        matrix: Some(matrix_path.to_string_lossy().into_owned()),
        profile: Some(ProfileParams { window_size: 2 }),
        weights,
        ..Default::default()
    };
    let config_path = dir.path().join("run.json");
    fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

    let config = RunConfig::from_json_file(&config_path).unwrap();
    let mut set = read_alignment(&fasta).unwrap();
    let matrix = config.prepare(&mut set).unwrap();
    let report = run_analysis(&set, &matrix, &config);

    // Total weight 4: the last C is backed by exactly half of it.
    assert_eq!(report.params.plurality, 2.0);
    assert_eq!(report.consensus.residues, "AC-Tc");

    let profile = report.profile.as_ref().unwrap();
    assert_eq!(profile.len(), 5);
    assert!(profile.scores.iter().all(|s| s.is_finite()));
}

#[test]
fn report_json_survives_a_round_trip_on_disk() {
    let dir = TempDir::new().unwrap();
    let (fasta, _) = write_inputs(&dir);

    let mut set = read_alignment(&fasta).unwrap();
    let config = RunConfig {
        profile: Some(ProfileParams::default()),
        ..Default::default()
    };
    let matrix = config.prepare(&mut set).unwrap();
    let report = run_analysis(&set, &matrix, &config);
    assert_eq!(report.matrix, "EDNAFULL");

    let out = dir.path().join("report.json");
    report.save_json(&out).unwrap();
    let back = ConsensusReport::load_json(&out).unwrap();
    assert_eq!(back, report);
}

#[test]
fn unknown_matrix_is_an_error() {
    let dir = TempDir::new().unwrap();
    let (fasta, _) = write_inputs(&dir);
    let mut set = read_alignment(&fasta).unwrap();
    let config = RunConfig {
        matrix: Some(dir.path().join("missing").to_string_lossy().into_owned()),
        ..Default::default()
    };
    assert!(config.prepare(&mut set).is_err());
    assert!(ScoringMatrix::builtin("BLOSUM999").is_err());
}
