//! Report digests.
//!
//! A report digest is the plain SHA-256 of the report bytes, with no domain
//! prefix, so it matches `sha256sum report.txt` and can be checked with
//! ordinary tools.
//!
//! Format: `"sha256:<lowercase hex>"`.

use sha2::{Digest, Sha256};

/// Algorithm tag for every digest this crate produces.
pub const DIGEST_ALGORITHM: &str = "sha256";

/// Digest of a finished report, always `sha256:<64 lowercase hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incremental SHA-256 over everything written to a report.
#[derive(Debug, Clone, Default)]
pub struct ReportHasher {
    inner: Sha256,
}

impl ReportHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Consume the hasher and produce the `sha256:<hex>` digest.
    #[must_use]
    pub fn finish(self) -> ContentHash {
        let hex_digest = hex::encode(self.inner.finalize());
        ContentHash(format!("{DIGEST_ALGORITHM}:{hex_digest}"))
    }
}

/// One-shot digest of a byte slice.
#[must_use]
pub fn digest_bytes(bytes: &[u8]) -> ContentHash {
    let mut hasher = ReportHasher::new();
    hasher.update(bytes);
    hasher.finish()
}
