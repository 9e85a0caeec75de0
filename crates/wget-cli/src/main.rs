use wget_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; never fail the download over it.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
    }

    let code = cli::run_from_args().await;
    std::process::exit(code);
}
