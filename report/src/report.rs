//! The report writer: the single append-only output of a run.
//!
//! # Line formats
//!
//! ```text
//! <key> <bytecodeHex>        bytecode line (key = name or file:name)
//! <key> NO BYTECODE          bytecode line when no bytecode object exists
//! <key> <metadataJSON>       metadata line, always after the bytecode line
//! <file>: ERROR              sentinel, replaces every line of the file
//! ```
//!
//! Lines end in `\n`. Every byte written is also fed to a SHA-256 hasher so
//! [`ReportWriter::finish`] can return the report digest without reading
//! the file back.
//!
//! Contract lines for a file are rendered in full before anything is
//! written, so a sentinel never follows a partial set of contract lines.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::digest::{ContentHash, ReportHasher};
use crate::driver::{ContractArtifact, InvokeError, ParsedResult};

/// Marker written in place of bytecode for contracts without a bytecode object.
pub const NO_BYTECODE_MARKER: &str = "NO BYTECODE";

/// Suffix of the per-file sentinel line.
pub const SENTINEL_SUFFIX: &str = ": ERROR";

/// Fatal report I/O failure. Ends the run.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("cannot create report {path}: {detail}")]
    Create { path: String, detail: String },
    #[error("report write failed: {detail}")]
    Write { detail: String },
    #[error("report flush failed: {detail}")]
    Flush { detail: String },
}

/// What a single (file, mode) pair contributed to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Contract lines were written.
    Contracts { contracts: usize, no_bytecode: usize },
    /// The sentinel line was written.
    Sentinel,
}

/// Totals for a finished report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub line_count: usize,
    pub sentinel_count: usize,
    pub no_bytecode_count: usize,
    /// `sha256:<hex>` of the full report bytes.
    pub digest: ContentHash,
}

/// Append-only, hashing line writer.
pub struct ReportWriter<W: Write> {
    out: W,
    hasher: ReportHasher,
    line_count: usize,
    sentinel_count: usize,
    no_bytecode_count: usize,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (truncating) the report file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Create`] if the file cannot be opened.
    pub fn create(path: &Path) -> Result<Self, ReportError> {
        let file = File::create(path).map_err(|e| ReportError::Create {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            hasher: ReportHasher::new(),
            line_count: 0,
            sentinel_count: 0,
            no_bytecode_count: 0,
        }
    }

    /// Write the lines for one invocation result.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Write`] if the underlying writer fails. An
    /// `Err` invocation result is not an error here; it becomes the sentinel.
    pub fn write_result(
        &mut self,
        file: &str,
        result: &Result<ParsedResult, InvokeError>,
    ) -> Result<FileOutcome, ReportError> {
        match result {
            Ok(parsed) => self.write_contracts(&parsed.contracts),
            Err(_) => {
                self.write_sentinel(file)?;
                Ok(FileOutcome::Sentinel)
            }
        }
    }

    /// Write the bytecode and metadata lines of each contract, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Write`] on writer failure.
    pub fn write_contracts(
        &mut self,
        contracts: &[ContractArtifact],
    ) -> Result<FileOutcome, ReportError> {
        let mut rendered = String::new();
        let mut no_bytecode = 0;
        for contract in contracts {
            let [bytecode_line, metadata_line] = contract_lines(contract);
            if contract.bytecode.is_none() {
                no_bytecode += 1;
            }
            rendered.push_str(&bytecode_line);
            rendered.push('\n');
            rendered.push_str(&metadata_line);
            rendered.push('\n');
        }
        self.write_raw(rendered.as_bytes())?;
        self.line_count += contracts.len() * 2;
        self.no_bytecode_count += no_bytecode;
        Ok(FileOutcome::Contracts {
            contracts: contracts.len(),
            no_bytecode,
        })
    }

    /// Write the `<file>: ERROR` sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Write`] on writer failure.
    pub fn write_sentinel(&mut self, file: &str) -> Result<(), ReportError> {
        let line = format!("{}\n", sentinel_line(file));
        self.write_raw(line.as_bytes())?;
        self.line_count += 1;
        self.sentinel_count += 1;
        Ok(())
    }

    /// Flush and return the totals and digest.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Flush`] if buffered bytes cannot be written.
    pub fn finish(mut self) -> Result<ReportSummary, ReportError> {
        self.out.flush().map_err(|e| ReportError::Flush {
            detail: e.to_string(),
        })?;
        Ok(ReportSummary {
            line_count: self.line_count,
            sentinel_count: self.sentinel_count,
            no_bytecode_count: self.no_bytecode_count,
            digest: self.hasher.finish(),
        })
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), ReportError> {
        self.out.write_all(bytes).map_err(|e| ReportError::Write {
            detail: e.to_string(),
        })?;
        self.hasher.update(bytes);
        Ok(())
    }
}

/// The bytecode line and metadata line of one contract (without newlines).
#[must_use]
pub fn contract_lines(contract: &ContractArtifact) -> [String; 2] {
    let key = contract.key();
    let bytecode = contract.bytecode.as_deref().unwrap_or(NO_BYTECODE_MARKER);
    [
        format!("{key} {bytecode}"),
        format!("{key} {}", contract.metadata),
    ]
}

/// The sentinel line for `file` (without newline).
#[must_use]
pub fn sentinel_line(file: &str) -> String {
    format!("{file}{SENTINEL_SUFFIX}")
}
