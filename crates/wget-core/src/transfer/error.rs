//! Transfer error type.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Why a transfer did not produce a body. Each variant keeps its cause in
/// `source()` so the full chain can be printed.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Only http and https targets are fetched.
    #[error("unsupported URL scheme `{scheme}` in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    /// libcurl rejected an option before the request started.
    #[error("failed to configure request for {url}")]
    Setup {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// No data arrived within the timeout (connect phase or a stalled read).
    #[error("timed out after {}s waiting on {url}", .timeout.as_secs_f64())]
    TimedOut {
        url: String,
        timeout: Duration,
        #[source]
        source: curl::Error,
    },

    /// DNS, connect, TLS, or protocol failure.
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Server refused the credentials (401, 403, 407).
    #[error("authentication failed for {url} (HTTP {status})")]
    Unauthorized { url: String, status: u32 },

    /// Any other non-2xx final status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// Writing the body to the sink failed (disk full, closed pipe, ...).
    #[error("failed to write response body")]
    Sink(#[source] io::Error),
}

impl TransferError {
    /// Map a non-2xx final status to its error.
    pub(crate) fn from_status(url: &str, status: u32) -> Self {
        match status {
            401 | 403 | 407 => TransferError::Unauthorized {
                url: url.to_string(),
                status,
            },
            _ => TransferError::HttpStatus {
                url: url.to_string(),
                status,
            },
        }
    }
}
