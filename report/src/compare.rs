//! Report comparison: what changed between a baseline and a candidate.
//!
//! Two views are computed:
//!
//! - positional differences (line N of each side), in order;
//! - multiset differences: lines that appear more often on one side,
//!   independent of position, so one inserted contract does not show up as
//!   a cascade of unrelated changes.
//!
//! Identity is decided by the report digests, so a report that differs only
//! in its final newline is never reported as identical. Lines are split on
//! `\n` alone; a stray `\r` stays part of its line.

use std::collections::BTreeMap;
use std::path::Path;

use crate::digest::{digest_bytes, ContentHash};

/// Error reading a report for comparison.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("cannot read {path}: {detail}")]
    Read { path: String, detail: String },
}

/// One differing line position (1-based). A side is `None` past its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDifference {
    pub line: usize,
    pub baseline: Option<String>,
    pub candidate: Option<String>,
}

/// Full comparison of two reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDiff {
    pub baseline_digest: ContentHash,
    pub candidate_digest: ContentHash,
    pub baseline_lines: usize,
    pub candidate_lines: usize,
    /// Every differing position, in order.
    pub differences: Vec<LineDifference>,
    /// Lines (with multiplicity) present in the baseline but not the candidate.
    pub removed: Vec<String>,
    /// Lines (with multiplicity) present in the candidate but not the baseline.
    pub added: Vec<String>,
}

impl ReportDiff {
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.baseline_digest == self.candidate_digest
    }
}

/// Compare two report texts.
#[must_use]
pub fn compare_reports(baseline: &str, candidate: &str) -> ReportDiff {
    let left: Vec<&str> = baseline.split_terminator('\n').collect();
    let right: Vec<&str> = candidate.split_terminator('\n').collect();

    let mut differences = Vec::new();
    for i in 0..left.len().max(right.len()) {
        let a = left.get(i).copied();
        let b = right.get(i).copied();
        if a != b {
            differences.push(LineDifference {
                line: i + 1,
                baseline: a.map(str::to_string),
                candidate: b.map(str::to_string),
            });
        }
    }

    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for &line in &left {
        *counts.entry(line).or_default() += 1;
    }
    for &line in &right {
        *counts.entry(line).or_default() -= 1;
    }
    let mut removed = Vec::new();
    let mut added = Vec::new();
    for (line, count) in counts {
        for _ in 0..count.max(0) {
            removed.push(line.to_string());
        }
        for _ in 0..(-count).max(0) {
            added.push(line.to_string());
        }
    }

    ReportDiff {
        baseline_digest: digest_bytes(baseline.as_bytes()),
        candidate_digest: digest_bytes(candidate.as_bytes()),
        baseline_lines: left.len(),
        candidate_lines: right.len(),
        differences,
        removed,
        added,
    }
}

/// Read a report file as text.
///
/// # Errors
///
/// Returns [`CompareError::Read`] if the file cannot be read as UTF-8.
pub fn read_report(path: &Path) -> Result<String, CompareError> {
    std::fs::read_to_string(path).map_err(|e| CompareError::Read {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}
