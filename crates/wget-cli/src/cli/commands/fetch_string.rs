//! `wget <url> string` – print the response body to stdout.

use wget_core::{get_string, Console, ResultCode, TransferRequest, TransferRunner};

pub fn run_fetch_string(
    runner: &TransferRunner,
    request: &TransferRequest<'_>,
    console: &mut Console<'_>,
) -> ResultCode {
    let code = get_string(runner, request, console);
    if code.is_completed() {
        tracing::info!(url = %request.target, "string fetch completed");
    } else {
        tracing::warn!(url = %request.target, result = %code, "string fetch did not complete");
    }
    code
}
