//! Engine error type: libcurl result codes with the option or phase that produced them.

use thiserror::Error;

/// Numeric result code reported by the engine (libcurl `CURLcode`).
pub type EngineCode = curl_sys::CURLcode;

/// `CURLE_WRITE_ERROR`: the write callback consumed fewer bytes than delivered.
pub const WRITE_ERROR: EngineCode = 23;
/// `CURLE_OPERATION_TIMEDOUT`.
pub const OPERATION_TIMEDOUT: EngineCode = 28;
/// `CURLE_UNKNOWN_OPTION`: libcurl was built without the feature behind an option.
pub const UNKNOWN_OPTION: EngineCode = 48;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Setting an engine option failed. Not fatal; later options are still tried.
    #[error("could not set option {option} (code {code}): {description}")]
    Option {
        option: &'static str,
        code: EngineCode,
        description: String,
    },
    /// The synchronous transfer returned a non-success code.
    #[error("transfer failed (code {code}): {description}")]
    Transfer { code: EngineCode, description: String },
}

impl EngineError {
    pub fn option(option: &'static str, e: curl::Error) -> Self {
        EngineError::Option {
            option,
            code: e.code(),
            description: describe(&e),
        }
    }

    pub fn transfer(e: curl::Error) -> Self {
        EngineError::Transfer {
            code: e.code(),
            description: describe(&e),
        }
    }

    pub fn code(&self) -> EngineCode {
        match self {
            EngineError::Option { code, .. } | EngineError::Transfer { code, .. } => *code,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.code() == OPERATION_TIMEDOUT
    }

    pub fn is_write_error(&self) -> bool {
        self.code() == WRITE_ERROR
    }
}

fn describe(e: &curl::Error) -> String {
    match e.extra_description() {
        Some(extra) => format!("{}: {}", e.description(), extra),
        None => e.description().to_string(),
    }
}
