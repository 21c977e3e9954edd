//! Size and SHA-256 of the downloaded file, so partial or throttled runs can be
//! compared against the server copy.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub len: u64,
    /// Lowercase hex SHA-256.
    pub sha256: String,
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes, sha256 {}", self.len, self.sha256)
    }
}

pub fn digest_file(path: &Path) -> Result<FileDigest> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let len = io::copy(&mut f, &mut hasher).with_context(|| format!("read {}", path.display()))?;
    Ok(FileDigest {
        len,
        sha256: hex::encode(hasher.finalize()),
    })
}
