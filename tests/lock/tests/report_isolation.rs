//! Build-graph and environment isolation of the report library.
//!
//! The report must be a pure function of the compiler and the corpus. The
//! library therefore never reads environment variables or wall-clock time,
//! and keeps CLI and subscriber crates out of its dependency table.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use lock_tests::corpus_helpers::workspace_root;

/// Forbidden patterns in non-comment library source lines.
const FORBIDDEN_PATTERNS: &[&str] = &[
    "std::env::var",
    "env::vars",
    "SystemTime::now",
    "Instant::now",
    "HashMap",
    "HashSet",
];

/// Crates that belong to the binaries, not the library.
const FORBIDDEN_DEPENDENCIES: &[&str] = &["clap", "tracing-subscriber"];

fn walk(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, violations);
        } else if path.extension().is_some_and(|e| e == "rs") {
            check_file(&path, violations);
        }
    }
}

fn check_file(path: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
            continue;
        }
        for pattern in FORBIDDEN_PATTERNS {
            if trimmed.contains(pattern) {
                violations.push((path.display().to_string(), line_no + 1, line.to_string()));
            }
        }
    }
}

#[test]
fn report_source_has_no_ambient_inputs() {
    let src = workspace_root().join("report").join("src");
    assert!(src.is_dir(), "report/src must exist at {}", src.display());

    let mut violations = Vec::new();
    walk(&src, &mut violations);

    if !violations.is_empty() {
        let mut msg = String::from("nondeterministic inputs found in report source:\n");
        for (file, line, content) in &violations {
            let _ = writeln!(msg, "  {file}:{line}: {content}");
        }
        panic!("{msg}");
    }
}

#[test]
fn report_cargo_toml_has_no_cli_dependencies() {
    let cargo_toml = workspace_root().join("report").join("Cargo.toml");
    let content = fs::read_to_string(&cargo_toml).expect("report/Cargo.toml must exist");

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        for dep in FORBIDDEN_DEPENDENCIES {
            assert!(
                !trimmed.starts_with(&format!("{dep} ")) && !trimmed.starts_with(&format!("{dep}=")),
                "report/Cargo.toml line {}: depends on {dep}: {trimmed}",
                line_no + 1
            );
        }
    }
}
