//! Legacy protocol: `<compiler> --combined-json bin,metadata <file> [--optimize]`.
//!
//! Expected stdout:
//!
//! ```text
//! {"contracts": {"<name>": {"bin": "<hex>", "metadata": "<json>"}}}
//! ```
//!
//! Contracts are keyed by name only. `bin` is always present in this
//! protocol (an interface yields an empty string), so a missing `bin` is a
//! shape failure rather than the no-bytecode state.

use std::path::PathBuf;

use super::process::run_captured;
use super::{
    parse_json, require_object, require_str, sorted_keys, CompilerDriver, ContractArtifact,
    InvokeError, OptimizerMode, ParsedResult,
};
use crate::config::Protocol;

/// Output kinds requested from the legacy CLI.
pub const COMBINED_JSON_OUTPUTS: &str = "bin,metadata";

/// Driver for the flag-based CLI.
#[derive(Debug, Clone)]
pub struct LegacyDriver {
    compiler: PathBuf,
    cwd: PathBuf,
}

impl LegacyDriver {
    #[must_use]
    pub fn new(compiler: PathBuf, cwd: PathBuf) -> Self {
        Self { compiler, cwd }
    }
}

impl CompilerDriver for LegacyDriver {
    fn protocol(&self) -> Protocol {
        Protocol::Legacy
    }

    fn invoke(&self, file: &str, mode: OptimizerMode) -> Result<ParsedResult, InvokeError> {
        let args = legacy_args(file, mode);
        let stdout = run_captured(&self.compiler, &args, &self.cwd, None)?.into_success_stdout()?;
        parse_legacy_output(&stdout)
    }
}

/// Argument vector for one legacy invocation.
#[must_use]
pub fn legacy_args(file: &str, mode: OptimizerMode) -> Vec<String> {
    let mut args = vec![
        "--combined-json".to_string(),
        COMBINED_JSON_OUTPUTS.to_string(),
        file.to_string(),
    ];
    if mode.enabled() {
        args.push("--optimize".to_string());
    }
    args
}

/// Extract contracts from legacy `--combined-json` output.
///
/// # Errors
///
/// Returns [`InvokeError`] if the output is not JSON, or if `contracts`,
/// any contract's `bin`, or any contract's `metadata` is missing or of the
/// wrong type.
pub fn parse_legacy_output(stdout: &[u8]) -> Result<ParsedResult, InvokeError> {
    let value = parse_json(stdout)?;
    let contracts = require_object(&value, "contracts", || "contracts".to_string())?;

    let mut out = Vec::with_capacity(contracts.len());
    for name in sorted_keys(contracts) {
        let entry = contracts[name]
            .as_object()
            .ok_or_else(|| InvokeError::WrongType {
                path: format!("contracts.{name}"),
                expected: "an object",
            })?;
        let bin = require_str(entry, "bin", || format!("contracts.{name}.bin"))?;
        let metadata = require_str(entry, "metadata", || format!("contracts.{name}.metadata"))?;
        out.push(ContractArtifact {
            source: None,
            name: name.clone(),
            bytecode: Some(bin.to_string()),
            metadata: metadata.to_string(),
        });
    }

    Ok(ParsedResult {
        contracts: out,
        diagnostics: Vec::new(),
    })
}
