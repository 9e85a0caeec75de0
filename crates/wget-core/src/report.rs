//! Output sinks and diagnostic printing.

use std::error::Error;
use std::io::{self, Write};

/// The two sinks an operation writes to: payloads and result lines go to
/// `out`; progress, notices and errors go to `err`.
pub struct Console<'a> {
    out: Box<dyn Write + 'a>,
    err: Box<dyn Write + 'a>,
}

impl<'a> Console<'a> {
    pub fn new(out: impl Write + 'a, err: impl Write + 'a) -> Self {
        Self {
            out: Box::new(out),
            err: Box::new(err),
        }
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    pub fn err(&mut self) -> &mut dyn Write {
        &mut *self.err
    }
}

impl Console<'static> {
    /// Process standard output and standard error.
    pub fn stdio() -> Self {
        Console::new(io::stdout(), io::stderr())
    }
}

/// Writes `err` and each of its sources on its own line, outermost first.
/// `depth` limits how many sources are followed (`None` = all).
pub fn write_error_chain(err: &dyn Error, sink: &mut dyn Write, depth: Option<usize>) {
    let _ = writeln!(sink, "{}", err);
    let mut source = err.source();
    let mut level = 0;
    while let Some(cause) = source {
        if depth.is_some_and(|d| level >= d) {
            break;
        }
        let _ = writeln!(sink, "{}", cause);
        source = cause.source();
        level += 1;
    }
}
