//! Shared plumbing for the `prepare_report` and `compare_reports` binaries.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

use bytecmp_report::config::Protocol;
use tracing::Level;

/// `--protocol` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProtocolArg {
    /// `--combined-json bin,metadata <file>`
    Legacy,
    /// `--standard-json` request on stdin
    Standard,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Legacy => Protocol::Legacy,
            ProtocolArg::Standard => Protocol::Standard,
        }
    }
}

/// Log level for a `-v` count: WARN, INFO, DEBUG, then TRACE.
#[must_use]
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the stderr fmt subscriber. Logs never share a stream with the
/// report or with the `key=value` summary on stdout.
pub fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(level_for_verbosity(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
