use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::transfer::{TlsVersion, TransferConfig};

/// Global configuration loaded from `~/.config/wget/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WgetConfig {
    /// Read timeout in seconds used when `-T` is not given.
    pub timeout_secs: u64,
    /// Optional bound on the connect phase; defaults to the read timeout.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Follow `Location` redirects.
    pub follow_redirects: bool,
    /// Maximum redirects followed per request.
    pub max_redirects: u32,
    /// Optional `User-Agent` override.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Lowest TLS version accepted for https targets ("1.0", "1.1", "1.2", "1.3").
    #[serde(default)]
    pub min_tls_version: Option<TlsVersion>,
    /// Minimum spacing between progress lines on stderr.
    pub progress_interval_ms: u64,
}

impl Default for WgetConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 180,
            connect_timeout_secs: None,
            follow_redirects: true,
            max_redirects: 10,
            user_agent: None,
            min_tls_version: None,
            progress_interval_ms: 500,
        }
    }
}

impl WgetConfig {
    /// Default per-request timeout for CLI invocations.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_secs.saturating_mul(1000))
    }

    /// Runner settings derived from this config.
    pub fn transfer_config(&self) -> TransferConfig {
        let mut transfer = TransferConfig {
            follow_redirects: self.follow_redirects,
            max_redirects: self.max_redirects,
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            min_tls_version: self.min_tls_version,
            progress_interval: Duration::from_millis(self.progress_interval_ms),
            ..TransferConfig::default()
        };
        if let Some(ref ua) = self.user_agent {
            transfer.user_agent = ua.clone();
        }
        transfer
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WgetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WgetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WgetConfig = toml::from_str(&data)?;
    Ok(cfg)
}
