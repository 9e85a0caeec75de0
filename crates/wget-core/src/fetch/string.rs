//! Fetch a response body into memory and print it.

use std::io::Write;

use super::{report_cancelled, report_failure, report_progress};
use crate::report::Console;
use crate::result::{ResultCode, TransferSession};
use crate::transfer::{
    Progress, TransferError, TransferOutcome, TransferRequest, TransferRunner,
};

/// Downloads the body and writes it, followed by a newline, to the console's
/// output sink. Nothing touches the filesystem.
pub fn get_string(
    runner: &TransferRunner,
    request: &TransferRequest<'_>,
    console: &mut Console<'_>,
) -> ResultCode {
    let mut session = TransferSession::start(request);
    let mut body = Vec::new();

    let outcome = runner.run(request, &mut body, &mut |p: Progress| {
        report_progress(console.err(), p)
    });
    session.record(ResultCode::classify(&outcome));

    match outcome {
        TransferOutcome::Succeeded(_) => {
            if let Err(e) = write_body(console.out(), &body) {
                report_failure(console.err(), &TransferError::Sink(e));
                session.record(ResultCode::Error);
            }
        }
        TransferOutcome::Cancelled => report_cancelled(console.err()),
        TransferOutcome::Failed(e) => report_failure(console.err(), &e),
    }

    session.finish()
}

fn write_body(out: &mut dyn Write, body: &[u8]) -> std::io::Result<()> {
    out.write_all(body)?;
    out.write_all(b"\n")?;
    out.flush()
}
