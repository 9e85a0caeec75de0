//! Tracing setup. Logs go to a file under the XDG state dir so stdout and
//! stderr stay reserved for payloads and progress lines.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const FILE_FILTER: &str = "info,wget_core=debug,wget=debug";
const STDERR_FILTER: &str = "warn";

/// `~/.local/state/wget/wget.log`, creating the directory if needed.
pub fn log_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("wget")?;
    Ok(dirs.place_state_file("wget.log")?)
}

/// Installs the global subscriber appending to [`log_path`] and returns the
/// path. `RUST_LOG` overrides the default filter.
///
/// On error nothing is installed and the caller may fall back to
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path().context("failed to locate log directory")?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_or(FILE_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(path)
}

/// Stderr-only logging for when the log file is unavailable.
///
/// Default level is `warn`: progress lines share stderr.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or(STDERR_FILTER))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
