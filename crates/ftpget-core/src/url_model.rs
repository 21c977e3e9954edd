//! Remote URL validation and local filename derivation.

use anyhow::{bail, Context, Result};
use url::Url;

/// Schemes libcurl handles for a single-file fetch that this tool is meant for.
const SUPPORTED_SCHEMES: &[&str] = &["ftp", "ftps", "sftp", "scp"];

/// Parse `raw` and reject schemes other than FTP/SSH transfers.
pub fn parse_remote(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid remote URL: {}", raw))?;
    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        bail!(
            "unsupported scheme {:?} in {} (expected one of {})",
            url.scheme(),
            raw,
            SUPPORTED_SCHEMES.join(", ")
        );
    }
    if url.host_str().map_or(true, str::is_empty) {
        bail!("remote URL has no host: {}", raw);
    }
    Ok(url)
}

/// Local filename for a remote URL: the last path segment, made safe for the local filesystem.
///
/// Returns `None` for a root or empty path (a directory listing, not a file).
pub fn filename_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    let name = sanitize_filename(segment);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Replace path separators and control characters with `_`, trim dots and
/// spaces, cap at 255 bytes.
fn sanitize_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let replaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');

    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
