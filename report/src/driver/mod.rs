//! Compiler drivers: one invocation per (source file, optimizer mode).
//!
//! Both protocol generations implement [`CompilerDriver`]. A driver never
//! panics and never writes to the report; it returns either a
//! [`ParsedResult`] with contracts already in report order, or an
//! [`InvokeError`] that the report writer turns into the sentinel line.
//!
//! # Ordering
//!
//! `ParsedResult::contracts` is sorted by `(source, name)` in byte order.
//! The compiler's own JSON key order is never observable.

pub mod legacy;
pub mod process;
pub mod standard;

use std::path::{Path, PathBuf};

use crate::config::{Protocol, ReportConfig};

pub use legacy::LegacyDriver;
pub use standard::StandardDriver;

/// The optimizer axis of a build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptimizerMode {
    Off,
    On,
}

impl OptimizerMode {
    /// Pass order of a run: optimizer off first, then on.
    pub const PASSES: [Self; 2] = [Self::Off, Self::On];

    #[must_use]
    pub fn enabled(self) -> bool {
        matches!(self, Self::On)
    }

    /// Stable label used in logs and pass summaries.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "optimizer-off",
            Self::On => "optimizer-on",
        }
    }
}

/// One compiled contract as it will appear in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    /// Originating source file. `None` for the legacy protocol, which keys
    /// contracts by name only.
    pub source: Option<String>,
    /// Contract name as reported by the compiler.
    pub name: String,
    /// Runtime bytecode hex. `None` when the compiler produced no bytecode
    /// object (interfaces, abstract contracts).
    pub bytecode: Option<String>,
    /// Metadata JSON, carried verbatim.
    pub metadata: String,
}

impl ContractArtifact {
    /// The report key: `<source>:<name>` or just `<name>`.
    #[must_use]
    pub fn key(&self) -> String {
        match &self.source {
            Some(source) => format!("{source}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A diagnostic the compiler reported alongside its output.
///
/// Diagnostics are logged and never influence report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    pub severity: String,
    pub message: String,
}

/// Successful, fully extracted compiler response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResult {
    /// Contracts sorted by `(source, name)`.
    pub contracts: Vec<ContractArtifact>,
    pub diagnostics: Vec<CompilerDiagnostic>,
}

/// Why an invocation produced no usable result.
///
/// Every variant collapses to the same `<file>: ERROR` report line; the
/// variants exist for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    /// The compiler process could not be started.
    #[error("failed to spawn {program}: {detail}")]
    Spawn { program: String, detail: String },
    /// I/O failure reading the source or talking to the process.
    #[error("I/O error: {detail}")]
    Io { detail: String },
    /// The process exited unsuccessfully or was killed by a signal.
    #[error("compiler exited with {status}")]
    ProcessFailed { status: String, stderr: String },
    /// Standard output was not UTF-8.
    #[error("compiler output is not valid UTF-8")]
    InvalidUtf8,
    /// Standard output did not parse as JSON.
    #[error("malformed JSON output: {detail}")]
    MalformedJson { detail: String },
    /// A required key is absent.
    #[error("missing field: {path}")]
    MissingField { path: String },
    /// A key is present with the wrong JSON type.
    #[error("field {path} is not {expected}")]
    WrongType { path: String, expected: &'static str },
}

impl InvokeError {
    /// Transport-level failures (process, I/O) as opposed to shape failures
    /// in otherwise well-formed output.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Spawn { .. } | Self::Io { .. } | Self::ProcessFailed { .. } | Self::InvalidUtf8
        )
    }
}

/// One compiler protocol.
pub trait CompilerDriver {
    /// Which protocol this driver speaks.
    fn protocol(&self) -> Protocol;

    /// Compile `file` (a name inside the corpus directory) under `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError`] on any process or extraction failure. The
    /// caller must not retry.
    fn invoke(&self, file: &str, mode: OptimizerMode) -> Result<ParsedResult, InvokeError>;
}

/// Build the driver selected by `config.protocol`.
///
/// The compiler path is resolved against the current directory when it is
/// relative and has a directory component, since compiler processes run
/// inside the corpus directory. Bare names are left for `PATH` lookup.
#[must_use]
pub fn driver_for(config: &ReportConfig) -> Box<dyn CompilerDriver> {
    let compiler = resolve_compiler(&config.compiler);
    match config.protocol {
        Protocol::Legacy => Box::new(LegacyDriver::new(compiler, config.corpus_dir.clone())),
        Protocol::Standard => Box::new(StandardDriver::new(
            compiler,
            config.corpus_dir.clone(),
            config.language.clone(),
        )),
    }
}

fn resolve_compiler(compiler: &Path) -> PathBuf {
    if compiler.is_relative() && compiler.components().count() > 1 {
        if let Ok(cwd) = std::env::current_dir() {
            return cwd.join(compiler);
        }
    }
    compiler.to_path_buf()
}

/// Sorted keys of a JSON object. Independent of `serde_json`'s map backing.
pub(crate) fn sorted_keys(map: &serde_json::Map<String, serde_json::Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

/// Parse captured stdout as a JSON value, trimming surrounding whitespace.
pub(crate) fn parse_json(stdout: &[u8]) -> Result<serde_json::Value, InvokeError> {
    let text = std::str::from_utf8(stdout).map_err(|_| InvokeError::InvalidUtf8)?;
    serde_json::from_str(text.trim()).map_err(|e| InvokeError::MalformedJson {
        detail: e.to_string(),
    })
}

/// Look up `key` in `parent` and require a string.
pub(crate) fn require_str<'a>(
    parent: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
    path: impl FnOnce() -> String,
) -> Result<&'a str, InvokeError> {
    match parent.get(key) {
        None => Err(InvokeError::MissingField { path: path() }),
        Some(value) => value.as_str().ok_or_else(|| InvokeError::WrongType {
            path: path(),
            expected: "a string",
        }),
    }
}

/// Look up `key` in `parent` and require an object.
pub(crate) fn require_object<'a>(
    parent: &'a serde_json::Value,
    key: &str,
    path: impl FnOnce() -> String,
) -> Result<&'a serde_json::Map<String, serde_json::Value>, InvokeError> {
    match parent.get(key) {
        None => Err(InvokeError::MissingField { path: path() }),
        Some(value) => value.as_object().ok_or_else(|| InvokeError::WrongType {
            path: path(),
            expected: "an object",
        }),
    }
}
