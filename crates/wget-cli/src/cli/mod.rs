//! CLI for wget-rs: argument parsing and dispatch to the string or file fetch.

mod commands;
mod paths;

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use url::Url;
use wget_core::config::{self, WgetConfig};
use wget_core::{Console, Credential, FileTarget, ResultCode, TransferRequest, TransferRunner};

use commands::{run_fetch_file, run_fetch_string};

/// Exit code for command-line usage errors.
const USAGE_EXIT_CODE: i32 = 1;

/// Download a URL to a file, or print its body with `string`.
#[derive(Debug, Parser)]
#[command(name = "wget", version)]
#[command(about = "wget-rs: fetch a URL over HTTP(S) to a file or to stdout", long_about = None)]
#[command(after_help = "Examples:\n  \
    wget https://example.com/file.zip -P downloads\n  \
    wget https://example.com/api string -u user -p secret\n  \
    wget https://example.com/file.zip -x -O ./newdir/file.zip")]
pub struct Cli {
    /// HTTP or HTTPS URL to fetch.
    pub url: Url,

    /// `string` prints the body to stdout instead of saving a file.
    #[arg(value_parser = ["string"], value_name = "string")]
    pub function: Option<String>,

    /// Same as the `string` argument.
    #[arg(short = 'S', long = "string")]
    pub string: bool,

    /// User name for HTTP authentication.
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password for HTTP authentication.
    #[arg(short, long)]
    pub password: Option<String>,

    /// Read timeout in seconds (default from config, 180).
    #[arg(short = 'T', long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Save to this file instead of a name derived from the response.
    #[arg(short = 'O', long = "output-document", value_name = "FILE")]
    pub output_document: Option<PathBuf>,

    /// Create the destination directory tree before downloading.
    #[arg(short = 'x', long = "force-directories")]
    pub force_directories: bool,

    /// Save files under this directory.
    #[arg(short = 'P', long = "directory-prefix", value_name = "PREFIX")]
    pub directory_prefix: Option<PathBuf>,
}

impl Cli {
    pub fn string_mode(&self) -> bool {
        self.string || self.function.is_some()
    }

    /// Credential from `-u`/`-p`; either one alone still authenticates.
    pub fn credential(&self) -> Option<Credential> {
        if self.user.is_none() && self.password.is_none() {
            return None;
        }
        Some(Credential::new(
            self.user.clone().unwrap_or_default(),
            self.password.clone().unwrap_or_default(),
        ))
    }

    pub fn timeout_or(&self, cfg: &WgetConfig) -> Duration {
        self.timeout
            .map(|secs| Duration::from_millis(secs.saturating_mul(1000)))
            .unwrap_or_else(|| cfg.timeout())
    }
}

/// Parse arguments. Help, version and usage errors are printed to stderr and
/// turned into the process exit code.
pub fn parse_args<I, T>(args: I) -> std::result::Result<Cli, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|err| {
        eprint!("{}", err.render());
        usage_exit_code(&err)
    })
}

fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => USAGE_EXIT_CODE,
    }
}

enum Mode {
    String,
    File(FileTarget),
}

pub async fn run_from_args() -> i32 {
    match parse_args(std::env::args_os()) {
        Ok(cli) => run(cli).await,
        Err(code) => code,
    }
}

async fn run(cli: Cli) -> i32 {
    let cfg = config::load_or_init().unwrap_or_else(|err| {
        tracing::warn!("config unavailable, using defaults: {:#}", err);
        WgetConfig::default()
    });
    tracing::debug!("loaded config: {:?}", cfg);

    let mode = match prepare_mode(&cli) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("{:#}", err);
            return ResultCode::Error.exit_code();
        }
    };

    let runner = TransferRunner::new(cfg.transfer_config());
    let timeout = cli.timeout_or(&cfg);
    let credential = cli.credential();
    let url = cli.url;
    let abort = Arc::new(AtomicBool::new(false));
    cancel_on_ctrl_c(Arc::clone(&abort));

    let fetch = tokio::task::spawn_blocking(move || {
        let request = TransferRequest::new(&url)
            .credential(credential.as_ref())
            .timeout(timeout)
            .abort_flag(&abort);
        let mut console = Console::stdio();
        match mode {
            Mode::String => run_fetch_string(&runner, &request, &mut console),
            Mode::File(target) => run_fetch_file(&runner, &request, &target, &mut console),
        }
    });

    match fetch.await {
        Ok(code) => code.exit_code(),
        Err(err) => {
            tracing::error!("fetch task failed: {}", err);
            ResultCode::Error.exit_code()
        }
    }
}

/// Resolves the destination for file mode and pre-creates it with `-x`.
fn prepare_mode(cli: &Cli) -> Result<Mode> {
    if cli.string_mode() {
        return Ok(Mode::String);
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let target = paths::resolve_destination(
        &cwd,
        cli.directory_prefix.as_deref(),
        cli.output_document.as_deref(),
    )?;
    if cli.force_directories {
        paths::create_destination_dir(&target)?;
    }
    Ok(Mode::File(target))
}

fn cancel_on_ctrl_c(abort: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling transfer");
            abort.store(true, Ordering::SeqCst);
        }
    });
}

#[cfg(test)]
mod tests;
