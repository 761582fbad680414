//! `check-oa`: decide whether a binary matrix is an orthogonal array.
//!
//! Reads the matrix from a file or stdin, one row per line, and prints a
//! single report line on stdout. Exit status: 0 orthogonal, 1 not
//! orthogonal, 2 malformed input or invalid parameters.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use oacheck::matrix::{CellAlphabet, MatrixLoader};
use oacheck::verify::DEFAULT_MAX_SUBSETS;
use oacheck::{BinaryMatrix, Outcome, Report, Verdict, Verifier};

#[derive(Debug, Parser)]
#[command(name = "check-oa", version, about = "Verify binary orthogonal arrays OA(N, k, 2, t)")]
struct Cli {
    /// Strength t to certify (checked at every weight 1..=t)
    strength: u32,

    /// Matrix file, one row of 0/1 tokens per line (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Scan column subsets on all cores
    #[arg(long)]
    parallel: bool,

    /// Refuse to run if more column subsets than this would be scanned
    #[arg(long, value_name = "N", env = "OACHECK_MAX_SUBSETS", default_value_t = DEFAULT_MAX_SUBSETS)]
    max_subsets: u64,

    /// Also accept T/F and true/false as cell values
    #[arg(long)]
    lenient: bool,

    /// Print nothing; report through the exit status only
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load(cli: &Cli) -> anyhow::Result<BinaryMatrix> {
    let alphabet = if cli.lenient {
        CellAlphabet::Lenient
    } else {
        CellAlphabet::Digits
    };
    let loader = MatrixLoader::new().alphabet(alphabet);

    let matrix = match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            loader
                .load(BufReader::new(file))
                .with_context(|| format!("cannot load matrix from {}", path.display()))?
        }
        None => loader.load(io::stdin().lock()).context("cannot load matrix from stdin")?,
    };
    Ok(matrix)
}

fn run(cli: &Cli) -> anyhow::Result<Verdict> {
    let matrix = load(cli)?;
    tracing::info!(runs = matrix.runs(), factors = matrix.factors(), "matrix loaded");

    if cli.parallel && !cfg!(feature = "parallel") {
        tracing::warn!("built without the `parallel` feature; scanning sequentially");
    }

    let verdict = Verifier::new()
        .max_subsets(cli.max_subsets)
        .parallel(cli.parallel)
        .verify(&matrix, cli.strength)?;
    Ok(verdict)
}

/// Run the check and print its report, mapping the result to an outcome.
fn execute(cli: &Cli) -> Outcome {
    match run(cli) {
        Ok(verdict) => {
            if !cli.quiet {
                println!("{}", Report::new(&verdict));
            }
            Outcome::from_verdict(&verdict)
        }
        Err(err) => {
            if !cli.quiet {
                eprintln!("error: {err:#}");
            }
            Outcome::Error
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    ExitCode::from(execute(&cli).exit_code())
}
