//! Structured protocol: `<compiler> --standard-json [--optimize]` with one
//! JSON request on stdin.
//!
//! Request:
//!
//! ```text
//! {"language": "Polynomial",
//!  "sources": {"<file>": {"content": "<text>"}},
//!  "settings": {"optimizer": {"enabled": <bool>},
//!               "outputSelection": {"*": {"*": ["svm.bytecode.object", "metadata"]}}}}
//! ```
//!
//! Response:
//!
//! ```text
//! {"contracts": {"<file>": {"<contract>": {"svm": {"bytecode": {"object": "<hex>"}},
//!                                         "metadata": "<json>"}}},
//!  "errors": [...]}
//! ```
//!
//! A missing `svm` or `svm.bytecode` is the no-bytecode state, not a
//! failure. Once `svm.bytecode` is present its `object` is required, and
//! `metadata` must always be present.
//!
//! The optimizer is set both in `settings` and as `--optimize`. The settings
//! payload is authoritative; both are derived from the same
//! [`OptimizerMode`] so they cannot disagree.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::process::run_captured;
use super::{
    parse_json, require_object, require_str, sorted_keys, CompilerDiagnostic, CompilerDriver,
    ContractArtifact, InvokeError, OptimizerMode, ParsedResult,
};
use crate::config::Protocol;

/// Output selection requested for every file and every contract.
pub const OUTPUT_SELECTION: [&str; 2] = ["svm.bytecode.object", "metadata"];

/// Wildcard matching every file / every contract in `outputSelection`.
const WILDCARD: &str = "*";

#[derive(Debug, Serialize)]
struct StandardRequest<'a> {
    language: &'a str,
    sources: BTreeMap<&'a str, SourceEntry<'a>>,
    settings: Settings,
}

#[derive(Debug, Serialize)]
struct SourceEntry<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Settings {
    optimizer: OptimizerSettings,
    #[serde(rename = "outputSelection")]
    output_selection: BTreeMap<&'static str, BTreeMap<&'static str, Vec<&'static str>>>,
}

#[derive(Debug, Serialize)]
struct OptimizerSettings {
    enabled: bool,
}

/// Entry of the response's `errors` array. Every field is optional so a
/// diagnostic never fails extraction.
#[derive(Debug, Deserialize)]
struct RawDiagnostic {
    severity: Option<String>,
    message: Option<String>,
    #[serde(rename = "formattedMessage")]
    formatted_message: Option<String>,
}

/// Driver for the `--standard-json` request/response protocol.
#[derive(Debug, Clone)]
pub struct StandardDriver {
    compiler: PathBuf,
    cwd: PathBuf,
    language: String,
}

impl StandardDriver {
    #[must_use]
    pub fn new(compiler: PathBuf, cwd: PathBuf, language: String) -> Self {
        Self {
            compiler,
            cwd,
            language,
        }
    }
}

impl CompilerDriver for StandardDriver {
    fn protocol(&self) -> Protocol {
        Protocol::Standard
    }

    fn invoke(&self, file: &str, mode: OptimizerMode) -> Result<ParsedResult, InvokeError> {
        let content =
            std::fs::read_to_string(self.cwd.join(file)).map_err(|e| InvokeError::Io {
                detail: format!("read {file}: {e}"),
            })?;
        let request = build_request(&self.language, file, &content, mode)?;
        let args = standard_args(mode);
        let stdout = run_captured(&self.compiler, &args, &self.cwd, Some(request.as_slice()))?
            .into_success_stdout()?;
        parse_standard_output(&stdout)
    }
}

/// Argument vector for one structured invocation.
#[must_use]
pub fn standard_args(mode: OptimizerMode) -> Vec<String> {
    let mut args = vec!["--standard-json".to_string()];
    if mode.enabled() {
        args.push("--optimize".to_string());
    }
    args
}

/// Serialize the stdin request for a single source file.
///
/// # Errors
///
/// Returns [`InvokeError::Io`] if serialization fails.
pub fn build_request(
    language: &str,
    file: &str,
    content: &str,
    mode: OptimizerMode,
) -> Result<Vec<u8>, InvokeError> {
    let request = StandardRequest {
        language,
        sources: BTreeMap::from([(file, SourceEntry { content })]),
        settings: Settings {
            optimizer: OptimizerSettings {
                enabled: mode.enabled(),
            },
            output_selection: BTreeMap::from([(
                WILDCARD,
                BTreeMap::from([(WILDCARD, OUTPUT_SELECTION.to_vec())]),
            )]),
        },
    };
    serde_json::to_vec(&request).map_err(|e| InvokeError::Io {
        detail: format!("serialize request: {e}"),
    })
}

/// Extract contracts from a `--standard-json` response.
///
/// # Errors
///
/// Returns [`InvokeError`] if the output is not JSON, if `contracts` is
/// missing (the usual shape of a failed compilation), or if a contract
/// entry lacks a string `metadata`.
pub fn parse_standard_output(stdout: &[u8]) -> Result<ParsedResult, InvokeError> {
    let value = parse_json(stdout)?;
    let diagnostics = extract_diagnostics(&value);

    let files = require_object(&value, "contracts", || "contracts".to_string())?;

    let mut out = Vec::new();
    for file in sorted_keys(files) {
        let contracts = files[file]
            .as_object()
            .ok_or_else(|| InvokeError::WrongType {
                path: format!("contracts.{file}"),
                expected: "an object",
            })?;
        for name in sorted_keys(contracts) {
            let entry = contracts[name]
                .as_object()
                .ok_or_else(|| InvokeError::WrongType {
                    path: format!("contracts.{file}.{name}"),
                    expected: "an object",
                })?;
            let bytecode = bytecode_object(&contracts[name], file, name)?;
            let metadata = require_str(entry, "metadata", || {
                format!("contracts.{file}.{name}.metadata")
            })?;
            out.push(ContractArtifact {
                source: Some(file.clone()),
                name: name.clone(),
                bytecode,
                metadata: metadata.to_string(),
            });
        }
    }

    Ok(ParsedResult {
        contracts: out,
        diagnostics,
    })
}

/// `svm.bytecode.object`, or `None` when `svm` or `svm.bytecode` is absent.
///
/// A present `svm.bytecode` must carry a string `object`.
fn bytecode_object(
    entry: &serde_json::Value,
    file: &str,
    name: &str,
) -> Result<Option<String>, InvokeError> {
    let Some(bytecode) = entry.get("svm").and_then(|svm| svm.get("bytecode")) else {
        return Ok(None);
    };
    let bytecode = bytecode.as_object().ok_or_else(|| InvokeError::WrongType {
        path: format!("contracts.{file}.{name}.svm.bytecode"),
        expected: "an object",
    })?;
    let object = require_str(bytecode, "object", || {
        format!("contracts.{file}.{name}.svm.bytecode.object")
    })?;
    Ok(Some(object.to_string()))
}

fn extract_diagnostics(value: &serde_json::Value) -> Vec<CompilerDiagnostic> {
    let Some(errors) = value.get("errors") else {
        return Vec::new();
    };
    let Ok(raw) = serde_json::from_value::<Vec<RawDiagnostic>>(errors.clone()) else {
        tracing::debug!("ignoring unrecognized errors array in compiler output");
        return Vec::new();
    };
    raw.into_iter()
        .map(|d| CompilerDiagnostic {
            severity: d.severity.unwrap_or_else(|| "unknown".to_string()),
            message: d
                .formatted_message
                .or(d.message)
                .unwrap_or_default()
                .trim_end()
                .to_string(),
        })
        .collect()
}
