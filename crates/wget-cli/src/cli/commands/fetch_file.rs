//! `wget <url> [-O file] [-P prefix]` – save the response body to a file.

use wget_core::{get_file, Console, FileTarget, ResultCode, TransferRequest, TransferRunner};

pub fn run_fetch_file(
    runner: &TransferRunner,
    request: &TransferRequest<'_>,
    target: &FileTarget,
    console: &mut Console<'_>,
) -> ResultCode {
    tracing::debug!(dir = %target.dir.display(), name = ?target.file_name, "file fetch");
    let fetched = get_file(runner, request, target, console);
    if fetched.code.is_completed() {
        tracing::info!(
            url = %request.target,
            path = %fetched.path.display(),
            "file fetch completed"
        );
    } else {
        tracing::warn!(
            url = %request.target,
            result = %fetched.code,
            path = %fetched.path.display(),
            "file fetch did not complete"
        );
    }
    fetched.code
}
