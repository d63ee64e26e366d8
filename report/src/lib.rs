//! Bytecmp Report: deterministic bytecode-regression reports for an external
//! contract compiler.
//!
//! The crate drives a compiler binary over a corpus of source files, once
//! per optimizer mode, and writes every contract's bytecode and metadata to
//! a single line-oriented report. The report is a pure function of the
//! compiler's behavior and the corpus, so two runs can be compared with a
//! plain diff.
//!
//! # Pipeline
//!
//! ```text
//! discover_corpus() → for mode in [off, on]:
//!   for file in corpus:  driver.invoke(file, mode)
//!     → Ok(ParsedResult)  → report.write_contracts()
//!     → Err(InvokeError)  → report.write_sentinel()
//!   → report.finish() → ReportSummary (line counts + sha256 digest)
//! ```
//!
//! # Module dependency direction
//!
//! `config` ← `corpus` ← `driver` ← `report` ← `runner`
//!
//! `digest` and `compare` are leaves used by `report` and the CLI.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compare;
pub mod config;
pub mod corpus;
pub mod digest;
pub mod driver;
pub mod report;
pub mod runner;
