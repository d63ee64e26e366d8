//! Run configuration.
//!
//! [`ReportConfig`] carries every knob of a run. Only the compiler path is
//! required; the defaults reproduce the canonical layout (`*.pol` in the
//! current directory, `report.txt` output, structured protocol).

use std::path::PathBuf;

/// Default source file extension (without the dot).
pub const DEFAULT_EXTENSION: &str = "pol";

/// Default report file name.
pub const DEFAULT_OUTPUT: &str = "report.txt";

/// Language identifier sent in structured requests.
pub const DEFAULT_LANGUAGE: &str = "Polynomial";

/// Which compiler invocation protocol to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// `--combined-json bin,metadata <file>`; contracts keyed by name only.
    Legacy,
    /// `--standard-json` with a JSON request on stdin; contracts nested by file.
    #[default]
    Standard,
}

impl Protocol {
    /// Stable label used in logs and on the command line.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Standard => "standard",
        }
    }
}

/// Configuration for a single report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Path to the compiler executable.
    pub compiler: PathBuf,
    /// Invocation protocol.
    pub protocol: Protocol,
    /// Directory scanned (non-recursively) for source files. Also the
    /// working directory of every compiler process.
    pub corpus_dir: PathBuf,
    /// Source extension, matched exactly and case-sensitively.
    pub extension: String,
    /// Report destination. Truncated at the start of the run.
    pub output: PathBuf,
    /// Language identifier for structured requests.
    pub language: String,
}

impl ReportConfig {
    /// Configuration with every default applied for the given compiler.
    #[must_use]
    pub fn new(compiler: impl Into<PathBuf>) -> Self {
        Self {
            compiler: compiler.into(),
            protocol: Protocol::default(),
            corpus_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    #[must_use]
    pub fn with_corpus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.corpus_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}
