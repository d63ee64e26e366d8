//! Corpus discovery: the sorted list of source files a run compiles.
//!
//! Filesystem iteration order is never observable. Names are collected into
//! a `BTreeSet`, so the corpus is always in lexicographic byte order.
//!
//! Discovery does not fail. A missing or unreadable directory is an empty
//! corpus, and unreadable entries are skipped.

use std::collections::BTreeSet;
use std::path::Path;

/// Sorted source file names (file names only, no directory component).
pub type Corpus = Vec<String>;

/// List the regular files in `dir` whose name ends in `.{extension}`.
///
/// Hidden files (leading `.`) are skipped, as are names that are not valid
/// UTF-8 since they cannot be carried in a JSON request. Symlinks to regular
/// files are included. Subdirectories are never entered.
#[must_use]
pub fn discover_corpus(dir: &Path, extension: &str) -> Corpus {
    let suffix = format!(".{extension}");
    let Ok(entries) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "corpus directory unreadable; empty corpus");
        return Vec::new();
    };

    let mut files = BTreeSet::new();
    for entry in entries.flatten() {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::debug!(name = ?entry.file_name(), "skipping non-UTF-8 file name");
            continue;
        };
        if name.starts_with('.') || !name.ends_with(&suffix) {
            continue;
        }
        if entry.path().is_file() {
            files.insert(name);
        }
    }

    files.into_iter().collect()
}
