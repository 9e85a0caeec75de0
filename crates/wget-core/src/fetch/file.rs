//! Fetch a response body into a staged temp file and promote it.

use std::io::Write;
use std::path::PathBuf;

use super::{report_cancelled, report_failure, report_progress};
use crate::naming;
use crate::report::Console;
use crate::result::{ResultCode, TransferSession};
use crate::staging::StagedFile;
use crate::transfer::{Progress, TransferOutcome, TransferRequest, TransferRunner};

/// Where a file fetch saves its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    /// Directory holding the temp file; relative names are resolved against it.
    pub dir: PathBuf,
    /// Explicit destination name. When `None` the name comes from
    /// `Content-Disposition` or the URL.
    pub file_name: Option<PathBuf>,
}

impl FileTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<PathBuf>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// Result of a file fetch: the code and the final (or attempted) path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFetch {
    pub code: ResultCode,
    pub path: PathBuf,
}

/// Downloads into a temp file in `target.dir`, then replaces the final file
/// only if the transfer completed. Prints `"<RESULT> <path>"` to the output
/// sink.
///
/// The temp file never outlives this call. A failed or cancelled transfer
/// leaves any existing file at the final path untouched.
pub fn get_file(
    runner: &TransferRunner,
    request: &TransferRequest<'_>,
    target: &FileTarget,
    console: &mut Console<'_>,
) -> FileFetch {
    let mut session = TransferSession::start(request);
    // Best guess before headers arrive; reported if the transfer fails.
    let attempted = destination(target, None, request);

    let (code, path) = match StagedFile::create_in(&target.dir) {
        Err(e) => {
            report_failure(console.err(), &e);
            (ResultCode::Error, attempted)
        }
        Ok(mut staged) => {
            let outcome = runner.run(request, staged.file_mut(), &mut |p: Progress| {
                report_progress(console.err(), p)
            });
            let code = ResultCode::classify(&outcome);
            match outcome {
                TransferOutcome::Succeeded(head) => {
                    let path = destination(target, head.content_disposition.as_deref(), request);
                    tracing::debug!(
                        temp = %staged.path().display(),
                        dest = %path.display(),
                        "promoting download"
                    );
                    match staged.promote(&path) {
                        Ok(()) => (code, path),
                        Err(e) => {
                            report_failure(console.err(), &e);
                            (ResultCode::Error, path)
                        }
                    }
                }
                TransferOutcome::Cancelled => {
                    staged.discard();
                    report_cancelled(console.err());
                    (code, attempted)
                }
                TransferOutcome::Failed(e) => {
                    staged.discard();
                    report_failure(console.err(), &e);
                    (code, attempted)
                }
            }
        }
    };

    session.record(code);
    let code = session.finish();
    let _ = writeln!(console.out(), "{} {}", code, path.display());
    let _ = console.out().flush();
    FileFetch { code, path }
}

fn destination(
    target: &FileTarget,
    content_disposition: Option<&str>,
    request: &TransferRequest<'_>,
) -> PathBuf {
    let name = naming::resolve_filename(
        target.file_name.as_deref(),
        content_disposition,
        request.target,
    );
    naming::final_path(&target.dir, &name)
}
