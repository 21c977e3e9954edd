use ftpget_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let Some(cli) = Cli::parse_or_report(std::env::args_os()) else {
        return;
    };

    if cli.log_file {
        if let Err(err) = logging::init_logging_file() {
            logging::init_logging_stderr();
            tracing::warn!("file logging unavailable, using stderr: {:#}", err);
        }
    } else {
        logging::init_logging_stderr();
    }

    // Failures are reported, never turned into a non-zero exit status.
    if let Err(err) = cli.run() {
        tracing::error!("ftpget error: {:#}", err);
    }
}
