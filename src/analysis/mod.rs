mod alignment;
mod consensus;
mod fasta;
mod matrix;
mod pairwise;
mod pipeline;
mod profile;
mod residues;
mod types;

pub use alignment::*;
pub use consensus::*;
pub use fasta::*;
pub use matrix::*;
pub use pairwise::*;
pub use pipeline::*;
pub use profile::*;
pub use residues::*;
pub use types::*;
