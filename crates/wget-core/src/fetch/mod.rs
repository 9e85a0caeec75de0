//! String and file fetch operations.
//!
//! Both run one transfer through a `TransferRunner`, report progress and
//! diagnostics to the console's error sink, and return a `ResultCode` that is
//! never `Unknown`. No error escapes these functions.

mod file;
mod string;

pub use file::{get_file, FileFetch, FileTarget};
pub use string::get_string;

use std::io::Write;

use crate::report::write_error_chain;
use crate::transfer::Progress;

fn report_progress(err: &mut dyn Write, progress: Progress) {
    let _ = writeln!(err, "{}", progress);
}

fn report_cancelled(err: &mut dyn Write) {
    let _ = writeln!(err, "cancelled");
}

fn report_failure(err: &mut dyn Write, error: &(dyn std::error::Error + 'static)) {
    tracing::warn!("fetch failed: {}", error);
    write_error_chain(error, err, None);
}
