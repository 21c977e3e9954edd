use crate::engine::{HostKeyPolicy, SshAuthMethod, SshAuthTypes};
use crate::url_model;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from `~/.config/ftpget/config.toml`.
///
/// Defaults reproduce the fixed test setup: a local vsftpd with a throttled
/// `local_max_rate` serving `files/test.txt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FtpgetConfig {
    /// Remote file to fetch (ftp, ftps, sftp or scp URL).
    pub url: String,
    pub username: String,
    pub password: String,
    /// Local output file. Empty = last segment of the URL path.
    pub destination: String,
    /// Abort when no data arrives for this many seconds.
    pub read_timeout_secs: u64,
    /// Optional connect timeout in seconds (None = libcurl default).
    pub connect_timeout_secs: Option<u64>,
    /// Full protocol trace from libcurl on stderr.
    pub verbose: bool,
    /// SSH authentication methods libcurl may try.
    pub ssh_auth_types: Vec<SshAuthMethod>,
    /// Accept any SSH host key. Insecure; for test servers only.
    pub accept_any_host_key: bool,
    /// Print SHA-256 of the downloaded file after the transfer.
    pub checksum: bool,
}

impl Default for FtpgetConfig {
    fn default() -> Self {
        Self {
            url: "ftp://127.0.0.1:21/files/test.txt".to_string(),
            username: "ftp-user".to_string(),
            password: "ftp-user".to_string(),
            destination: "test.txt".to_string(),
            read_timeout_secs: 60,
            connect_timeout_secs: None,
            verbose: true,
            ssh_auth_types: vec![
                SshAuthMethod::Publickey,
                SshAuthMethod::Password,
                SshAuthMethod::Host,
                SshAuthMethod::Keyboard,
                SshAuthMethod::Agent,
            ],
            accept_any_host_key: true,
            checksum: true,
        }
    }
}

/// Validated, engine-ready view of the configuration.
#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub destination: PathBuf,
    pub read_timeout: Duration,
    pub connect_timeout: Option<Duration>,
    pub verbose: bool,
    pub ssh_auth_types: SshAuthTypes,
    pub host_key_policy: HostKeyPolicy,
}

impl FtpgetConfig {
    pub fn transfer_settings(&self) -> Result<TransferSettings> {
        let url = url_model::parse_remote(&self.url)?;
        let destination = if self.destination.trim().is_empty() {
            url_model::filename_from_url(&url)
                .with_context(|| format!("cannot derive a local filename from {}", self.url))?
        } else {
            self.destination.clone()
        };
        if self.read_timeout_secs == 0 {
            anyhow::bail!("read_timeout_secs must be at least 1");
        }

        Ok(TransferSettings {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            destination: PathBuf::from(destination),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            verbose: self.verbose,
            ssh_auth_types: SshAuthTypes::from_methods(&self.ssh_auth_types),
            host_key_policy: if self.accept_any_host_key {
                HostKeyPolicy::AcceptAll
            } else {
                HostKeyPolicy::Verify
            },
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ftpget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FtpgetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FtpgetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<FtpgetConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: FtpgetConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}
