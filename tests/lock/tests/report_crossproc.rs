//! Cross-process determinism for report runs.
//!
//! Spawns the `report_fixture` binary under several environment variants
//! and asserts that all produce identical summaries and byte-identical
//! reports. This shows that the report is not influenced by process-level
//! state (cwd, locale, env vars) or by the order files were created in.

use std::path::Path;
use std::process::Command;

use lock_tests::corpus_helpers::{write_corpus, MIXED_CORPUS};

/// Run the fixture with the given cwd and environment overrides.
/// Returns (stdout, report bytes).
fn run_variant(
    corpus_dir: &Path,
    output: &Path,
    protocol: &str,
    work_dir: &Path,
    env_overrides: &[(&str, &str)],
) -> (String, Vec<u8>) {
    let bin = env!("CARGO_BIN_EXE_report_fixture");
    let compiler = env!("CARGO_BIN_EXE_fake_polc");

    let mut command = Command::new(bin);
    command
        .arg(compiler)
        .arg(corpus_dir)
        .arg(output)
        .arg(protocol)
        .current_dir(work_dir);

    // Clear locale-related env to establish baseline, then apply overrides.
    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let out = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={}, overrides={env_overrides:?}): {e}", work_dir.display())
    });

    assert!(
        out.status.success(),
        "report_fixture exited with {}: stderr={}",
        out.status,
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8(out.stdout).expect("stdout is valid UTF-8");
    let report = std::fs::read(output).expect("report written");
    (stdout, report)
}

fn assert_env_invariant(protocol: &str) {
    let corpus = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_corpus(corpus.path(), MIXED_CORPUS);
    let output = out.path().join("report.txt");

    // Variant 1: baseline, cwd is the corpus directory.
    let baseline = run_variant(corpus.path(), &output, protocol, corpus.path(), &[]);
    assert!(
        baseline.0.starts_with("report_digest=sha256:"),
        "baseline output missing report_digest: {}",
        baseline.0
    );

    // Variant 2: different cwd.
    let alt_cwd = std::env::temp_dir();
    let variant_cwd = run_variant(corpus.path(), &output, protocol, &alt_cwd, &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes");

    // Variant 3: different locale env.
    let variant_locale = run_variant(
        corpus.path(),
        &output,
        protocol,
        corpus.path(),
        &[("LC_ALL", "C"), ("LANG", "C")],
    );
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    // Variant 4: spurious env vars that should not affect output.
    let variant_noise = run_variant(
        corpus.path(),
        &output,
        protocol,
        corpus.path(),
        &[
            ("BYTECMP_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("LC_COLLATE", "sv_SE.UTF-8"),
        ],
    );
    assert_eq!(baseline, variant_noise, "output differs with spurious env vars");
}

#[test]
fn crossproc_standard_protocol_env_variants() {
    assert_env_invariant("standard");
}

#[test]
fn crossproc_legacy_protocol_env_variants() {
    assert_env_invariant("legacy");
}

#[test]
fn creation_order_does_not_change_report() {
    let forward = tempfile::tempdir().unwrap();
    let reverse = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_corpus(forward.path(), MIXED_CORPUS);
    let reversed: Vec<(&str, &str)> = MIXED_CORPUS.iter().rev().copied().collect();
    write_corpus(reverse.path(), &reversed);

    let a = run_variant(
        forward.path(),
        &out.path().join("a.txt"),
        "standard",
        forward.path(),
        &[],
    );
    let b = run_variant(
        reverse.path(),
        &out.path().join("b.txt"),
        "standard",
        reverse.path(),
        &[],
    );
    assert_eq!(a, b, "report depends on file creation order");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let corpus = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_corpus(corpus.path(), MIXED_CORPUS);

    let first = run_variant(
        corpus.path(),
        &out.path().join("first.txt"),
        "legacy",
        corpus.path(),
        &[],
    );
    let second = run_variant(
        corpus.path(),
        &out.path().join("second.txt"),
        "legacy",
        corpus.path(),
        &[],
    );
    assert_eq!(first, second);
    assert!(first.0.contains("lines=25\n"), "unexpected summary: {}", first.0);
    assert!(first.0.contains("errors=7\n"), "unexpected summary: {}", first.0);
}
