//! SSH authentication method set and host-identity policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One SSH authentication method libcurl may try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SshAuthMethod {
    Publickey,
    Password,
    Host,
    Keyboard,
    Agent,
}

impl SshAuthMethod {
    /// libcurl `CURLSSH_AUTH_*` bit.
    pub fn bit(self) -> u32 {
        match self {
            SshAuthMethod::Publickey => 1 << 0,
            SshAuthMethod::Password => 1 << 1,
            SshAuthMethod::Host => 1 << 2,
            SshAuthMethod::Keyboard => 1 << 3,
            SshAuthMethod::Agent => 1 << 4,
        }
    }
}

/// Bitmask of allowed methods, as passed to `CURLOPT_SSH_AUTH_TYPES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SshAuthTypes(u32);

impl SshAuthTypes {
    pub const NONE: SshAuthTypes = SshAuthTypes(0);

    pub fn all() -> Self {
        Self::from_methods(&[
            SshAuthMethod::Publickey,
            SshAuthMethod::Password,
            SshAuthMethod::Host,
            SshAuthMethod::Keyboard,
            SshAuthMethod::Agent,
        ])
    }

    pub fn from_methods(methods: &[SshAuthMethod]) -> Self {
        SshAuthTypes(methods.iter().fold(0, |acc, m| acc | m.bit()))
    }

    pub fn contains(self, method: SshAuthMethod) -> bool {
        self.0 & method.bit() != 0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

/// How the engine treats the remote host key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostKeyPolicy {
    /// Leave libcurl's known-hosts checking in place.
    #[default]
    Verify,
    /// Accept any host key without checking.
    ///
    /// Insecure. This is the diagnostic tool's historical behavior and only
    /// makes sense against a test server you control.
    AcceptAll,
}

impl fmt::Display for HostKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostKeyPolicy::Verify => write!(f, "verify"),
            HostKeyPolicy::AcceptAll => write!(f, "accept-all (insecure)"),
        }
    }
}
