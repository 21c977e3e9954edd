//! One download: configure the engine option by option, perform, close the sink.
//!
//! Option failures are logged and collected; they never stop the remaining
//! options or the transfer. The sink is closed exactly once after `perform`
//! returns, whatever the outcome.

use crate::config::TransferSettings;
use crate::engine::{EngineError, TransferEngine, TransferOutcome};
use crate::sink::{FileSink, SinkSummary};

/// Everything that happened during one run.
#[derive(Debug)]
pub struct TransferReport {
    pub config_errors: Vec<EngineError>,
    pub transfer: Result<(), EngineError>,
    pub sink: SinkSummary,
}

impl TransferReport {
    /// A failed transfer outranks configuration errors; otherwise the first
    /// configuration error is reported.
    pub fn outcome(&self) -> TransferOutcome {
        if let Err(e) = &self.transfer {
            return TransferOutcome::TransferError { code: e.code() };
        }
        match self.config_errors.first() {
            Some(EngineError::Option { option, code, .. }) => TransferOutcome::ConfigError {
                option: *option,
                code: *code,
            },
            Some(EngineError::Transfer { code, .. }) => {
                TransferOutcome::TransferError { code: *code }
            }
            None => TransferOutcome::Success,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.transfer.is_ok()
    }
}

/// Applies options in order, remembering failures.
struct Configurer<'e, E: TransferEngine> {
    engine: &'e mut E,
    errors: Vec<EngineError>,
}

impl<'e, E: TransferEngine> Configurer<'e, E> {
    fn apply(&mut self, f: impl FnOnce(&mut E) -> Result<(), EngineError>) {
        if let Err(e) = f(&mut *self.engine) {
            tracing::error!(code = e.code(), "{}", e);
            self.errors.push(e);
        }
    }
}

/// Run a single download with `engine` according to `settings`.
pub fn run_transfer<E: TransferEngine>(
    engine: &mut E,
    settings: &TransferSettings,
) -> TransferReport {
    let mut sink = FileSink::new(&settings.destination);

    let mut cfg = Configurer {
        engine,
        errors: Vec::new(),
    };
    cfg.apply(|e| e.set_url(&settings.url));
    cfg.apply(|e| e.set_username(&settings.username));
    cfg.apply(|e| e.set_password(&settings.password));
    cfg.apply(|e| e.set_verbose(settings.verbose));
    cfg.apply(|e| e.set_ssh_auth_types(settings.ssh_auth_types));
    cfg.apply(|e| e.set_host_key_policy(settings.host_key_policy));
    cfg.apply(|e| e.set_read_timeout(settings.read_timeout));
    if let Some(t) = settings.connect_timeout {
        cfg.apply(|e| e.set_connect_timeout(t));
    }
    let Configurer { engine, errors } = cfg;

    tracing::info!(
        url = %settings.url,
        destination = %settings.destination.display(),
        read_timeout_secs = settings.read_timeout.as_secs(),
        host_key_policy = %settings.host_key_policy,
        "starting transfer"
    );
    let transfer = engine.perform(&mut sink);
    match &transfer {
        Ok(()) => tracing::info!(bytes = sink.bytes_written(), "transfer complete"),
        Err(e) => {
            if e.is_timeout() {
                tracing::error!(code = e.code(), "read timeout hit: {}", e);
            } else {
                tracing::error!(code = e.code(), "{}", e);
            }
        }
    }

    let summary = sink.finish();
    if let Some(e) = &summary.write_error {
        tracing::error!(path = %summary.path.display(), "destination write error: {}", e);
    }

    TransferReport {
        config_errors: errors,
        transfer,
        sink: summary,
    }
}
