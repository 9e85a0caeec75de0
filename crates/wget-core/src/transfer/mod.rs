//! Transfer runner: one HTTP(S) GET with credentials, timeout and progress.
//!
//! Uses the curl crate (libcurl easy interface). A run blocks until the
//! request finishes and returns exactly one `TransferOutcome`; progress is
//! reported through a caller-supplied hook while the body streams into the
//! sink.
//!
//! Timeout model: `timeout` bounds the connect phase (unless a separate
//! connect timeout is configured) and then acts as a read timeout, meaning
//! the transfer aborts once no body byte has arrived for that long. It is
//! not a stopwatch on the whole request; a slow but steady download runs to
//! completion.

mod error;
mod head;
mod progress;

pub use error::TransferError;
pub use head::ResponseHead;
pub use progress::Progress;

use curl::easy::{Auth, Easy, NetRc, SslVersion};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use url::Url;

/// Timeout applied when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(240_000);

/// Lowest TLS protocol version the runner will negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TlsVersion {
    #[serde(rename = "1.0")]
    Tls10,
    #[serde(rename = "1.1")]
    Tls11,
    #[serde(rename = "1.2")]
    Tls12,
    #[serde(rename = "1.3")]
    Tls13,
}

impl From<TlsVersion> for SslVersion {
    fn from(v: TlsVersion) -> Self {
        match v {
            TlsVersion::Tls10 => SslVersion::Tlsv10,
            TlsVersion::Tls11 => SslVersion::Tlsv11,
            TlsVersion::Tls12 => SslVersion::Tlsv12,
            TlsVersion::Tls13 => SslVersion::Tlsv13,
        }
    }
}

/// Per-runner settings. Each runner carries its own copy, so runners with
/// different security settings can coexist in one process.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub follow_redirects: bool,
    pub max_redirects: u32,
    /// Connect-phase bound; `None` uses the request timeout.
    pub connect_timeout: Option<Duration>,
    /// `None` leaves the choice to libcurl.
    pub min_tls_version: Option<TlsVersion>,
    pub user_agent: String,
    /// Minimum spacing between progress reports (first and last always fire).
    pub progress_interval: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            max_redirects: 10,
            connect_timeout: None,
            min_tls_version: None,
            user_agent: concat!("wget-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            progress_interval: Duration::from_millis(500),
        }
    }
}

/// Username/password pair for HTTP Basic or Digest auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub user: String,
    pub password: String,
}

impl Credential {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One GET against a target. Without a credential the runner falls back to
/// the ambient identity (`~/.netrc`, if present).
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub target: &'a Url,
    pub credential: Option<&'a Credential>,
    pub timeout: Duration,
    /// Set from outside (e.g. a Ctrl-C handler) to cancel the transfer.
    pub abort: Option<&'a AtomicBool>,
}

impl<'a> TransferRequest<'a> {
    pub fn new(target: &'a Url) -> Self {
        Self {
            target,
            credential: None,
            timeout: DEFAULT_TIMEOUT,
            abort: None,
        }
    }

    pub fn credential(mut self, credential: Option<&'a Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn abort_flag(mut self, abort: &'a AtomicBool) -> Self {
        self.abort = Some(abort);
        self
    }

    fn aborted(&self) -> bool {
        self.abort.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Terminal state of one run.
#[derive(Debug)]
pub enum TransferOutcome {
    /// The full body reached the sink; carries the final response headers.
    Succeeded(ResponseHead),
    /// The abort flag was raised before the transfer finished.
    Cancelled,
    Failed(TransferError),
}

/// Executes transfers with a fixed `TransferConfig`.
#[derive(Debug, Clone, Default)]
pub struct TransferRunner {
    config: TransferConfig,
}

/// State shared by the curl callbacks of one run.
struct Tracker {
    head: RefCell<ResponseHead>,
    received: Cell<u64>,
    reported: Cell<Option<u64>>,
    last_report: Cell<Option<Instant>>,
    sink_error: RefCell<Option<io::Error>>,
    interval: Duration,
}

impl Tracker {
    fn new(interval: Duration) -> Self {
        Self {
            head: RefCell::new(ResponseHead::default()),
            received: Cell::new(0),
            reported: Cell::new(None),
            last_report: Cell::new(None),
            sink_error: RefCell::new(None),
            interval,
        }
    }

    fn snapshot(&self) -> Progress {
        Progress {
            received: self.received.get(),
            total: self.head.borrow().content_length,
        }
    }

    /// Report if bytes arrived since the last report and the interval has passed.
    fn maybe_report(&self, progress: &mut dyn FnMut(Progress), now: Instant) {
        if self.reported.get() == Some(self.received.get()) {
            return;
        }
        if let Some(last) = self.last_report.get() {
            if now.duration_since(last) < self.interval {
                return;
            }
        }
        self.report(progress, now);
    }

    /// Final report, skipped if the last one already showed these bytes.
    fn finish(&self, progress: &mut dyn FnMut(Progress)) {
        if self.reported.get() != Some(self.received.get()) {
            self.report(progress, Instant::now());
        }
    }

    fn report(&self, progress: &mut dyn FnMut(Progress), now: Instant) {
        self.reported.set(Some(self.received.get()));
        self.last_report.set(Some(now));
        progress(self.snapshot());
    }
}

impl TransferRunner {
    pub fn new(config: TransferConfig) -> Self {
        Self { config }
    }

    /// Runs one GET, streaming the 2xx body into `sink`.
    ///
    /// Bodies of non-2xx responses (auth challenges, error pages) never
    /// reach the sink. `progress` is called from this thread while the
    /// transfer runs.
    pub fn run(
        &self,
        request: &TransferRequest<'_>,
        sink: &mut dyn Write,
        progress: &mut dyn FnMut(Progress),
    ) -> TransferOutcome {
        let url = request.target.as_str();
        let scheme = request.target.scheme();
        if scheme != "http" && scheme != "https" {
            return TransferOutcome::Failed(TransferError::UnsupportedScheme {
                url: url.to_string(),
                scheme: scheme.to_string(),
            });
        }
        if request.aborted() {
            return TransferOutcome::Cancelled;
        }

        let mut easy = Easy::new();
        if let Err(source) = self.configure(&mut easy, request) {
            return TransferOutcome::Failed(TransferError::Setup {
                url: url.to_string(),
                source,
            });
        }

        tracing::info!(
            url,
            timeout_ms = request.timeout.as_millis() as u64,
            authenticated = request.credential.is_some(),
            "starting transfer"
        );

        let tracker = Tracker::new(self.config.progress_interval);
        let performed = perform(&mut easy, &tracker, request, sink, progress);

        if let Some(e) = tracker.sink_error.take() {
            tracing::warn!(url, "sink write failed: {}", e);
            return TransferOutcome::Failed(TransferError::Sink(e));
        }
        if let Err(source) = performed {
            if source.is_aborted_by_callback() && request.aborted() {
                tracing::info!(url, "transfer cancelled");
                return TransferOutcome::Cancelled;
            }
            tracing::warn!(url, "transfer failed: {}", source);
            let error = if source.is_operation_timedout() {
                TransferError::TimedOut {
                    url: url.to_string(),
                    timeout: request.timeout,
                    source,
                }
            } else {
                TransferError::Network {
                    url: url.to_string(),
                    source,
                }
            };
            return TransferOutcome::Failed(error);
        }

        let mut head = tracker.head.take();
        match easy.response_code() {
            Ok(code) => head.status = code,
            Err(source) => {
                return TransferOutcome::Failed(TransferError::Network {
                    url: url.to_string(),
                    source,
                })
            }
        }
        if !head.is_success() {
            tracing::warn!(url, status = head.status, "non-success response");
            return TransferOutcome::Failed(TransferError::from_status(url, head.status));
        }
        if let Err(e) = sink.flush() {
            return TransferOutcome::Failed(TransferError::Sink(e));
        }

        // Restore the head so the last report carries the announced total.
        let received = tracker.received.get();
        *tracker.head.borrow_mut() = head.clone();
        tracker.finish(progress);

        tracing::info!(
            url,
            status = head.status,
            bytes = received,
            content_length = ?head.content_length,
            "transfer completed"
        );
        TransferOutcome::Succeeded(head)
    }

    fn configure(&self, easy: &mut Easy, request: &TransferRequest<'_>) -> Result<(), curl::Error> {
        let read_timeout = at_least_one_second(request.timeout);

        easy.url(request.target.as_str())?;
        easy.get(true)?;
        easy.follow_location(self.config.follow_redirects)?;
        easy.max_redirections(self.config.max_redirects)?;
        easy.useragent(&self.config.user_agent)?;
        easy.connect_timeout(
            self.config
                .connect_timeout
                .map(at_least_one_second)
                .unwrap_or(read_timeout),
        )?;
        // Read timeout: abort once the rate stays below 1 byte/s for the whole window.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(read_timeout)?;
        easy.progress(true)?;

        if let Some(min) = self.config.min_tls_version {
            easy.ssl_min_max_version(min.into(), SslVersion::Default)?;
        }

        match request.credential {
            Some(credential) => {
                easy.username(&credential.user)?;
                easy.password(&credential.password)?;
                let mut auth = Auth::new();
                auth.basic(true).digest(true);
                easy.http_auth(&auth)?;
            }
            None => easy.netrc(NetRc::Optional)?,
        }
        Ok(())
    }
}

/// libcurl works in whole seconds here and treats 0 as "no limit".
fn at_least_one_second(d: Duration) -> Duration {
    d.max(Duration::from_secs(1))
}

fn perform(
    easy: &mut Easy,
    tracker: &Tracker,
    request: &TransferRequest<'_>,
    sink: &mut dyn Write,
    progress: &mut dyn FnMut(Progress),
) -> Result<(), curl::Error> {
    let mut transfer = easy.transfer();
    transfer.header_function(|data| {
        tracker.head.borrow_mut().apply_raw_line(data);
        true
    })?;
    transfer.write_function(|data| {
        if !tracker.head.borrow().is_success() {
            // Discard challenge and error bodies.
            return Ok(data.len());
        }
        match sink.write_all(data) {
            Ok(()) => {
                tracker.received.set(tracker.received.get() + data.len() as u64);
                Ok(data.len())
            }
            Err(e) => {
                *tracker.sink_error.borrow_mut() = Some(e);
                Ok(0) // abort transfer
            }
        }
    })?;
    transfer.progress_function(|_, _, _, _| {
        if request.aborted() {
            return false;
        }
        tracker.maybe_report(&mut *progress, Instant::now());
        true
    })?;
    transfer.perform()
}
