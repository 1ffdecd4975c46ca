use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use msa_consensus::{
    compute_consensus, compute_profile, AlignedSequenceSet, ConsensusParams, ProfileParams,
    ScoringMatrix,
};

const AMINO_ACIDS: &[u8] = b"ARNDCQEGHILKMFPSTWYV";

/// Deterministic alignment: a random ancestor with per-row substitutions and gaps.
fn mutated_alignment(rows: usize, columns: usize) -> AlignedSequenceSet {
    let mut state: u64 = 42;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (state >> 33) as usize
    };

    let ancestor: Vec<u8> = (0..columns)
        .map(|_| AMINO_ACIDS[next() % AMINO_ACIDS.len()])
        .collect();

    let sequences: Vec<String> = (0..rows)
        .map(|_| {
            ancestor
                .iter()
                .map(|&c| match next() % 10 {
                    0 => b'-',
                    1 | 2 => AMINO_ACIDS[next() % AMINO_ACIDS.len()],
                    _ => c,
                })
                .map(char::from)
                .collect()
        })
        .collect();

    let refs: Vec<&str> = sequences.iter().map(|s| s.as_str()).collect();
    AlignedSequenceSet::from_strs(&refs)
}

fn bench_consensus(c: &mut Criterion) {
    let matrix = ScoringMatrix::default_for(true);
    let mut group = c.benchmark_group("consensus");
    for &rows in &[10usize, 50, 200] {
        let set = mutated_alignment(rows, 500);
        let params = ConsensusParams::for_set(&set);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &set, |b, set| {
            b.iter(|| compute_consensus(black_box(set), matrix, params))
        });
    }
    group.finish();
}

fn bench_profile(c: &mut Criterion) {
    let matrix = ScoringMatrix::default_for(true);
    let mut group = c.benchmark_group("profile");
    for &rows in &[10usize, 50, 200] {
        let set = mutated_alignment(rows, 500);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &set, |b, set| {
            b.iter(|| compute_profile(black_box(set), matrix, ProfileParams::default()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_consensus, bench_profile);
criterion_main!(benches);
