//! libcurl-backed engine (curl crate, plus curl-sys for SSH options the safe API lacks).

use super::{EngineError, HostKeyPolicy, SshAuthTypes, TransferEngine};
use crate::sink::FileSink;
use curl::easy::Easy;
use std::os::raw::{c_char, c_int, c_long, c_void};
use std::time::Duration;

// Option ids from curl.h; CURLOPTTYPE_LONG = 0, CURLOPTTYPE_FUNCTIONPOINT = 20000.
const CURLOPT_SSH_AUTH_TYPES: curl_sys::CURLoption = 151;
const CURLOPT_SSH_HOSTKEYFUNCTION: curl_sys::CURLoption = 20_000 + 316;
const CURLKHMATCH_OK: c_int = 0;

type HostKeyCallback = extern "C" fn(*mut c_void, c_int, *const c_char, usize) -> c_int;

extern "C" fn accept_any_host_key(
    _clientp: *mut c_void,
    _keytype: c_int,
    _key: *const c_char,
    _keylen: usize,
) -> c_int {
    CURLKHMATCH_OK
}

/// One libcurl easy handle configured for a single download.
pub struct CurlEngine {
    easy: Easy,
}

impl CurlEngine {
    pub fn new() -> Self {
        Self { easy: Easy::new() }
    }

    fn setopt_long(
        &mut self,
        name: &'static str,
        option: curl_sys::CURLoption,
        value: c_long,
    ) -> Result<(), EngineError> {
        // SAFETY: the handle is live for the lifetime of `self` and `option` takes a long.
        let rc = unsafe { curl_sys::curl_easy_setopt(self.easy.raw(), option, value) };
        check(name, rc)
    }
}

impl Default for CurlEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn check(name: &'static str, rc: curl_sys::CURLcode) -> Result<(), EngineError> {
    if rc == curl_sys::CURLE_OK {
        Ok(())
    } else {
        Err(EngineError::option(name, curl::Error::new(rc)))
    }
}

impl TransferEngine for CurlEngine {
    fn set_url(&mut self, url: &str) -> Result<(), EngineError> {
        self.easy
            .url(url)
            .map_err(|e| EngineError::option("CURLOPT_URL", e))
    }

    fn set_username(&mut self, username: &str) -> Result<(), EngineError> {
        self.easy
            .username(username)
            .map_err(|e| EngineError::option("CURLOPT_USERNAME", e))
    }

    fn set_password(&mut self, password: &str) -> Result<(), EngineError> {
        self.easy
            .password(password)
            .map_err(|e| EngineError::option("CURLOPT_PASSWORD", e))
    }

    fn set_verbose(&mut self, verbose: bool) -> Result<(), EngineError> {
        self.easy
            .verbose(verbose)
            .map_err(|e| EngineError::option("CURLOPT_VERBOSE", e))
    }

    fn set_ssh_auth_types(&mut self, types: SshAuthTypes) -> Result<(), EngineError> {
        self.setopt_long(
            "CURLOPT_SSH_AUTH_TYPES",
            CURLOPT_SSH_AUTH_TYPES,
            types.bits() as c_long,
        )
    }

    fn set_host_key_policy(&mut self, policy: HostKeyPolicy) -> Result<(), EngineError> {
        match policy {
            HostKeyPolicy::Verify => Ok(()),
            HostKeyPolicy::AcceptAll => {
                tracing::warn!("host key checking disabled: any SSH host key will be accepted");
                let callback: HostKeyCallback = accept_any_host_key;
                // SAFETY: `callback` matches curl_sshhostkeycallback and has 'static lifetime.
                let rc = unsafe {
                    curl_sys::curl_easy_setopt(
                        self.easy.raw(),
                        CURLOPT_SSH_HOSTKEYFUNCTION,
                        callback,
                    )
                };
                check("CURLOPT_SSH_HOSTKEYFUNCTION", rc)
            }
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), EngineError> {
        // Stall detection: below 1 byte/s for `timeout` aborts with CURLE_OPERATION_TIMEDOUT.
        self.easy
            .low_speed_limit(1)
            .map_err(|e| EngineError::option("CURLOPT_LOW_SPEED_LIMIT", e))?;
        self.easy
            .low_speed_time(timeout)
            .map_err(|e| EngineError::option("CURLOPT_LOW_SPEED_TIME", e))
    }

    fn set_connect_timeout(&mut self, timeout: Duration) -> Result<(), EngineError> {
        self.easy
            .connect_timeout(timeout)
            .map_err(|e| EngineError::option("CURLOPT_CONNECTTIMEOUT", e))
    }

    fn perform(&mut self, sink: &mut FileSink) -> Result<(), EngineError> {
        let mut transfer = self.easy.transfer();
        transfer
            .write_function(|data| Ok(sink.write_chunk(Some(data)).consumed()))
            .map_err(|e| EngineError::option("CURLOPT_WRITEFUNCTION", e))?;
        transfer.perform().map_err(EngineError::transfer)
    }
}
