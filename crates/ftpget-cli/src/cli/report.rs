//! Human-readable end-of-run summary on stdout.

use ftpget_core::checksum;
use ftpget_core::engine::TransferOutcome;
use ftpget_core::session::TransferReport;
use ftpget_core::sink::SinkState;

pub fn outcome_line(outcome: TransferOutcome) -> String {
    match outcome {
        TransferOutcome::Success => "result: ok".to_string(),
        TransferOutcome::ConfigError { option, code } => {
            format!("result: ok with option errors (first: {} code {})", option, code)
        }
        TransferOutcome::TransferError { code } => {
            format!("result: transfer failed (code {})", code)
        }
    }
}

pub fn print_summary(report: &TransferReport, with_checksum: bool) {
    println!("{}", outcome_line(report.outcome()));
    let sink = &report.sink;
    match sink.state {
        SinkState::Unopened => println!("{}: not created", sink.path.display()),
        SinkState::Open => {
            println!("{}: {} bytes written", sink.path.display(), sink.bytes_written);
            if with_checksum {
                match checksum::digest_file(&sink.path) {
                    Ok(d) => println!("sha256: {}", d.sha256),
                    Err(e) => tracing::warn!("checksum failed: {:#}", e),
                }
            }
        }
    }
}
