//! Transfer engine seam.
//!
//! The engine owns the protocol work (FTP/SSH state machines, authentication,
//! timeout enforcement). This crate only configures it and supplies the sink.

mod auth;
mod error;
mod libcurl;

pub use self::auth::{HostKeyPolicy, SshAuthMethod, SshAuthTypes};
pub use self::error::{
    EngineCode, EngineError, OPERATION_TIMEDOUT, UNKNOWN_OPTION, WRITE_ERROR,
};
pub use self::libcurl::CurlEngine;

use crate::sink::FileSink;
use std::time::Duration;

/// Options and entry point the session needs from a transfer engine.
///
/// Every setter reports failure independently so callers can log it and
/// carry on with the remaining options.
pub trait TransferEngine {
    fn set_url(&mut self, url: &str) -> Result<(), EngineError>;
    fn set_username(&mut self, username: &str) -> Result<(), EngineError>;
    fn set_password(&mut self, password: &str) -> Result<(), EngineError>;
    /// Full protocol trace on stderr.
    fn set_verbose(&mut self, verbose: bool) -> Result<(), EngineError>;
    fn set_ssh_auth_types(&mut self, types: SshAuthTypes) -> Result<(), EngineError>;
    fn set_host_key_policy(&mut self, policy: HostKeyPolicy) -> Result<(), EngineError>;
    /// Abort when no data arrives for `timeout`.
    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), EngineError>;
    fn set_connect_timeout(&mut self, timeout: Duration) -> Result<(), EngineError>;
    /// Run the transfer synchronously, feeding every received chunk to `sink`.
    fn perform(&mut self, sink: &mut FileSink) -> Result<(), EngineError>;
}

/// Collapsed result of one run, with the engine's numeric code for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Success,
    ConfigError { option: &'static str, code: EngineCode },
    TransferError { code: EngineCode },
}
