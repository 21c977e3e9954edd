//! Library/version banner printed before the transfer.

use std::fmt;

/// What the linked libcurl was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    pub curl: String,
    pub ssl: Option<String>,
    pub libssh: Option<String>,
    pub ntlm: bool,
    pub http2: bool,
    pub ipv6: bool,
}

impl VersionReport {
    pub fn current() -> Self {
        let v = curl::Version::get();
        Self {
            curl: v.version().to_string(),
            ssl: v.ssl_version().map(str::to_string),
            libssh: v.libssh_version().map(str::to_string),
            ntlm: v.feature_ntlm(),
            http2: v.feature_http2(),
            ipv6: v.feature_ipv6(),
        }
    }

    /// True if libcurl can speak SSH at all; without it the SSH options are rejected.
    pub fn has_ssh(&self) -> bool {
        self.libssh.is_some()
    }
}

impl fmt::Display for VersionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Curl: libcurl/{}", self.curl)?;
        writeln!(f, "SSL: {}", self.ssl.as_deref().unwrap_or("none"))?;
        writeln!(f, "NTLM: {}", self.ntlm as u8)?;
        writeln!(f, "HTTP/2: {}", self.http2 as u8)?;
        writeln!(f, "SSH2: {}", self.libssh.as_deref().unwrap_or("none"))?;
        write!(f, "IPv6: {}", self.ipv6 as u8)
    }
}
