//! MSA Consensus - command-line front end
//!
//! ```bash
//! # Consensus of a protein alignment with EBLOSUM62
//! msa_consensus consensus -i aln.fa -o consensus.fa
//!
//! # Stricter consensus: 3 identical residues required per column
//! msa_consensus consensus -i aln.fa --plurality 2 --identity 3
//!
//! # Similarity profile over a 7-column window, as JSON
//! msa_consensus profile -i aln.fa -w 7 --json
//! ```

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::Level;

use msa_consensus::{
    read_alignment, run_analysis, ConsensusReport, ProfileParams, RunConfig, ThreadCount,
    DEFAULT_WINDOW,
};

#[derive(Debug, Parser)]
#[command(
    name = "msa_consensus",
    version,
    about = "Consensus sequences and similarity profiles for aligned sequences"
)]
struct Cli {
    /// More log output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the consensus sequence
    Consensus(ConsensusCmd),
    /// Compute the windowed similarity profile
    Profile(ProfileCmd),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeqType {
    Auto,
    Protein,
    Nucleotide,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Aligned FASTA file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Built-in matrix name (EBLOSUM62, EDNAFULL) or matrix file
    #[arg(short, long, value_name = "MATRIX")]
    matrix: Option<String>,

    /// Sequence type
    #[arg(long = "type", value_enum, default_value_t = SeqType::Auto)]
    seqtype: SeqType,

    /// JSON run configuration; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Worker threads (default: all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ConsensusCmd {
    #[command(flatten)]
    input: InputArgs,

    /// Minimum positive-match weight for a consensus residue (default: half the total weight)
    #[arg(long)]
    plurality: Option<f64>,

    /// Positive-match weight at or below which residues are lower-cased (default: half the total weight)
    #[arg(long = "setcase")]
    case_threshold: Option<f64>,

    /// Minimum number of identical residues per column
    #[arg(long)]
    identity: Option<usize>,

    /// Name of the consensus record
    #[arg(long)]
    name: Option<String>,

    /// FASTA line width (0 for a single line)
    #[arg(long, default_value_t = 60)]
    width: usize,
}

#[derive(Debug, Args)]
struct ProfileCmd {
    #[command(flatten)]
    input: InputArgs,

    /// Window size in columns
    #[arg(short, long)]
    window: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Consensus(cmd) => run_consensus(cmd),
        Command::Profile(cmd) => run_profile(cmd),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Merge the config file (if any) with the shared flags.
fn load_config(args: &InputArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("load config: {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(matrix) = &args.matrix {
        config.matrix = Some(matrix.clone());
    }
    if let Some(n) = args.threads {
        config.threads = ThreadCount::Fixed(n);
    }
    match args.seqtype {
        SeqType::Auto => {}
        SeqType::Protein => config.protein = Some(true),
        SeqType::Nucleotide => config.protein = Some(false),
    }
    Ok(config)
}

fn analyze(args: &InputArgs, config: &RunConfig) -> Result<ConsensusReport> {
    let mut set = read_alignment(&args.input)
        .with_context(|| format!("read alignment: {}", args.input.display()))?;
    let matrix = config.prepare(&mut set).context("prepare inputs")?;
    Ok(run_analysis(&set, &matrix, config))
}

fn run_consensus(cmd: ConsensusCmd) -> Result<()> {
    let mut config = load_config(&cmd.input)?;
    if cmd.plurality.is_some() {
        config.consensus.plurality = cmd.plurality;
    }
    if cmd.case_threshold.is_some() {
        config.consensus.case_threshold = cmd.case_threshold;
    }
    if cmd.identity.is_some() {
        config.consensus.min_identity = cmd.identity;
    }
    if cmd.name.is_some() {
        config.consensus_name = cmd.name.clone();
    }

    let report = analyze(&cmd.input, &config)?;
    let text = if cmd.input.json {
        report.to_json_pretty()?
    } else {
        report.consensus.to_fasta(cmd.width)
    };
    write_output(cmd.input.output.as_ref(), &text)
}

fn run_profile(cmd: ProfileCmd) -> Result<()> {
    let mut config = load_config(&cmd.input)?;
    let window_size = cmd
        .window
        .or(config.profile.map(|p| p.window_size))
        .unwrap_or(DEFAULT_WINDOW);
    config.profile = Some(ProfileParams { window_size });

    let report = analyze(&cmd.input, &config)?;
    let text = if cmd.input.json {
        report.to_json_pretty()?
    } else {
        let mut out = String::new();
        if let Some(profile) = &report.profile {
            for (i, score) in profile.scores.iter().enumerate() {
                out.push_str(&format!("{}\t{:.4}\n", i + 1, score));
            }
        }
        out
    };
    write_output(cmd.input.output.as_ref(), &text)
}

fn write_output(path: Option<&PathBuf>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(text.as_bytes())?;
            handle.flush()?;
        }
    }
    Ok(())
}
