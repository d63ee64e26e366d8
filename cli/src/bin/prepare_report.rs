//! Drive a compiler over the corpus and write `report.txt`.
//!
//! Usage: `prepare_report <compiler> [--protocol legacy|standard]
//! [--corpus-dir DIR] [--output FILE] [-v...]`
//!
//! Stdout: four lines, each `key=value`:
//!   `report`=<path>
//!   `report_digest`=sha256:...
//!   `lines`=<count>
//!   `errors`=<sentinel count>
//!
//! Exit codes: 0 on a completed run (per-file failures included), 1 if the
//! report could not be written, 2 on usage error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use bytecmp_cli::{init_logging, ProtocolArg};
use bytecmp_report::config::{ReportConfig, DEFAULT_OUTPUT};
use bytecmp_report::runner::run;

#[derive(Debug, Parser)]
#[command(
    name = "prepare_report",
    about = "Compile every source in the corpus with the optimizer off and on, and write a diffable bytecode report"
)]
struct Cli {
    /// Path to the compiler executable.
    compiler: PathBuf,

    /// Compiler invocation protocol.
    #[arg(long, value_enum, default_value_t = ProtocolArg::Standard)]
    protocol: ProtocolArg,

    /// Directory containing the `.pol` sources.
    #[arg(long, default_value = ".")]
    corpus_dir: PathBuf,

    /// Report destination (truncated).
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ReportConfig::new(cli.compiler)
        .with_protocol(cli.protocol.into())
        .with_corpus_dir(cli.corpus_dir)
        .with_output(cli.output);

    match run(&config) {
        Ok(summary) => {
            println!("report={}", config.output.display());
            println!("report_digest={}", summary.report.digest);
            println!("lines={}", summary.report.line_count);
            println!("errors={}", summary.report.sentinel_count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "report run aborted");
            eprintln!("prepare_report: {e}");
            ExitCode::FAILURE
        }
    }
}
