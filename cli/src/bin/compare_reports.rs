//! Compare a baseline report against a candidate report.
//!
//! Usage: `compare_reports <baseline> <candidate> [--limit N] [-v...]`
//!
//! Exit codes: 0 identical, 1 different, 2 usage error, 3 unreadable report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use bytecmp_cli::init_logging;
use bytecmp_report::compare::{compare_reports, read_report};

const EXIT_DIFFERENT: u8 = 1;
const EXIT_UNREADABLE: u8 = 3;

#[derive(Debug, Parser)]
#[command(
    name = "compare_reports",
    about = "Show where two bytecode reports differ"
)]
struct Cli {
    /// Report produced by the reference compiler.
    baseline: PathBuf,

    /// Report produced by the compiler under test.
    candidate: PathBuf,

    /// Maximum number of differing positions to print.
    #[arg(long, default_value_t = 20)]
    limit: usize,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (baseline, candidate) = match (read_report(&cli.baseline), read_report(&cli.candidate)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("compare_reports: {e}");
            return ExitCode::from(EXIT_UNREADABLE);
        }
    };

    let diff = compare_reports(&baseline, &candidate);
    tracing::info!(
        baseline_lines = diff.baseline_lines,
        candidate_lines = diff.candidate_lines,
        differing = diff.differences.len(),
        "compared reports"
    );

    if diff.is_identical() {
        println!(
            "identical lines={} digest={}",
            diff.baseline_lines, diff.baseline_digest
        );
        return ExitCode::SUCCESS;
    }

    println!("baseline_digest={}", diff.baseline_digest);
    println!("candidate_digest={}", diff.candidate_digest);
    if diff.differences.is_empty() {
        println!("@@ lines match; reports differ in final newline");
    }

    for d in diff.differences.iter().take(cli.limit) {
        println!("@@ line {}", d.line);
        match &d.baseline {
            Some(line) => println!("- {line}"),
            None => println!("- <end of report>"),
        }
        match &d.candidate {
            Some(line) => println!("+ {line}"),
            None => println!("+ <end of report>"),
        }
    }
    if diff.differences.len() > cli.limit {
        println!(
            "... {} more differing lines",
            diff.differences.len() - cli.limit
        );
    }
    println!(
        "differing_positions={} removed={} added={}",
        diff.differences.len(),
        diff.removed.len(),
        diff.added.len()
    );
    ExitCode::from(EXIT_DIFFERENT)
}
