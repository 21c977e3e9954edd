//! CLI for the ftpget diagnostic client.

mod report;

use anyhow::Result;
use clap::Parser;
use ftpget_core::config::{self, FtpgetConfig};
use ftpget_core::diagnostics::VersionReport;
use ftpget_core::engine::CurlEngine;
use ftpget_core::session;
use std::ffi::OsString;
use std::path::PathBuf;

/// Fetch one file over FTP through libcurl and report whether the read timeout was honored.
///
/// Without arguments the settings come from `~/.config/ftpget/config.toml`
/// (created with the built-in defaults on first run).
#[derive(Debug, Parser)]
#[command(name = "ftpget", version)]
#[command(about = "Single-file FTP fetch for testing libcurl read timeouts", long_about = None)]
pub struct Cli {
    /// Read settings from this TOML file instead of the XDG config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log to `~/.local/state/ftpget/ftpget.log` instead of stderr.
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    /// Parse arguments. Usage errors, `--help` and `--version` are printed
    /// and yield `None` so the process still exits 0.
    pub fn parse_or_report<I, T>(args: I) -> Option<Cli>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Some(cli),
            Err(err) => {
                let _ = err.print();
                None
            }
        }
    }

    pub fn load_config(&self) -> Result<FtpgetConfig> {
        match &self.config {
            Some(path) => config::load_from_path(path),
            None => match config::load_or_init() {
                Ok(cfg) => Ok(cfg),
                Err(err) => {
                    tracing::warn!("no usable config file, using built-in defaults: {:#}", err);
                    Ok(FtpgetConfig::default())
                }
            },
        }
    }

    pub fn run(&self) -> Result<()> {
        let cfg = self.load_config()?;
        let shown = FtpgetConfig {
            password: "***".into(),
            ..cfg.clone()
        };
        tracing::debug!("loaded config: {:?}", shown);

        let versions = VersionReport::current();
        println!("{}", versions);
        if !versions.has_ssh() {
            tracing::warn!("libcurl has no SSH support; SSH options will be rejected");
        }

        let settings = cfg.transfer_settings()?;
        let mut engine = CurlEngine::new();
        let transfer = session::run_transfer(&mut engine, &settings);

        report::print_summary(&transfer, cfg.checksum);
        Ok(())
    }
}
