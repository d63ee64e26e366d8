//! Run orchestration: corpus × optimizer passes → one report.
//!
//! ```text
//! for mode in [Off, On]:          (pass order is fixed)
//!   for file in corpus:           (sorted)
//!     driver.invoke(file, mode)   (one blocking process)
//!     report.write_result(...)    (contract lines or sentinel)
//! report.finish()                 (flush + digest)
//! ```
//!
//! Per-file failures are absorbed into sentinel lines and logged. Only
//! report I/O failures end a run early.

use std::io::Write;

use crate::config::ReportConfig;
use crate::corpus::discover_corpus;
use crate::driver::process::excerpt;
use crate::driver::{driver_for, CompilerDiagnostic, CompilerDriver, InvokeError, OptimizerMode};
use crate::report::{FileOutcome, ReportError, ReportSummary, ReportWriter};

/// A run could not complete.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Per-pass totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub mode: OptimizerMode,
    pub files: usize,
    pub contracts: usize,
    pub no_bytecode: usize,
    pub sentinels: usize,
    /// Compiler diagnostics seen in successful responses.
    pub diagnostics: usize,
}

impl PassSummary {
    fn new(mode: OptimizerMode) -> Self {
        Self {
            mode,
            files: 0,
            contracts: 0,
            no_bytecode: 0,
            sentinels: 0,
            diagnostics: 0,
        }
    }

    fn record(&mut self, outcome: FileOutcome) {
        self.files += 1;
        match outcome {
            FileOutcome::Contracts {
                contracts,
                no_bytecode,
            } => {
                self.contracts += contracts;
                self.no_bytecode += no_bytecode;
            }
            FileOutcome::Sentinel => self.sentinels += 1,
        }
    }
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub corpus: Vec<String>,
    pub passes: Vec<PassSummary>,
    pub report: ReportSummary,
}

/// Execute a full run as described by `config`.
///
/// # Errors
///
/// Returns [`RunError`] if the report cannot be created, written or flushed.
/// Compiler failures never produce an error.
pub fn run(config: &ReportConfig) -> Result<RunSummary, RunError> {
    let driver = driver_for(config);
    let corpus = discover_corpus(&config.corpus_dir, &config.extension);
    tracing::info!(
        protocol = driver.protocol().label(),
        corpus_dir = %config.corpus_dir.display(),
        files = corpus.len(),
        output = %config.output.display(),
        "starting report run"
    );

    let mut report = ReportWriter::create(&config.output)?;
    let passes = run_passes(driver.as_ref(), &corpus, &mut report)?;
    let summary = report.finish()?;

    tracing::info!(
        lines = summary.line_count,
        errors = summary.sentinel_count,
        digest = %summary.digest,
        "report complete"
    );
    Ok(RunSummary {
        corpus,
        passes,
        report: summary,
    })
}

/// Drive both optimizer passes over `corpus`, appending to `report`.
///
/// # Errors
///
/// Returns [`ReportError`] on report write failure.
pub fn run_passes<W: Write>(
    driver: &dyn CompilerDriver,
    corpus: &[String],
    report: &mut ReportWriter<W>,
) -> Result<Vec<PassSummary>, ReportError> {
    let mut passes = Vec::with_capacity(OptimizerMode::PASSES.len());
    for mode in OptimizerMode::PASSES {
        let _span = tracing::info_span!("pass", mode = mode.label()).entered();
        let mut pass = PassSummary::new(mode);
        for file in corpus {
            let result = driver.invoke(file, mode);
            match &result {
                Ok(parsed) => {
                    log_diagnostics(file, mode, &parsed.diagnostics);
                    pass.diagnostics += parsed.diagnostics.len();
                }
                Err(e) => log_failure(file, mode, e),
            }
            pass.record(report.write_result(file, &result)?);
        }
        tracing::info!(
            files = pass.files,
            contracts = pass.contracts,
            errors = pass.sentinels,
            diagnostics = pass.diagnostics,
            "pass complete"
        );
        passes.push(pass);
    }
    Ok(passes)
}

fn log_diagnostics(file: &str, mode: OptimizerMode, diagnostics: &[CompilerDiagnostic]) {
    for diagnostic in diagnostics {
        tracing::debug!(
            file,
            mode = mode.label(),
            severity = %diagnostic.severity,
            text = %diagnostic.message,
            "compiler diagnostic"
        );
    }
}

fn log_failure(file: &str, mode: OptimizerMode, error: &InvokeError) {
    match error {
        InvokeError::ProcessFailed { stderr, .. } => tracing::warn!(
            file,
            mode = mode.label(),
            %error,
            stderr = %excerpt(stderr),
            "compilation failed; writing sentinel"
        ),
        _ => tracing::warn!(
            file,
            mode = mode.label(),
            %error,
            transport = error.is_transport(),
            "compilation failed; writing sentinel"
        ),
    }
}
