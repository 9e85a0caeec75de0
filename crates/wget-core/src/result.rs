//! Result codes and per-operation session bookkeeping.

use std::fmt;
use std::time::Duration;

use crate::transfer::{TransferOutcome, TransferRequest};

/// Outcome of a fetch operation. The discriminant is the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    /// Initial value; never returned from a finished operation.
    Unknown = -1,
    Completed = 0,
    Cancelled = 1,
    Error = 2,
}

impl ResultCode {
    /// Map a transfer outcome to its code.
    pub fn classify(outcome: &TransferOutcome) -> ResultCode {
        match outcome {
            TransferOutcome::Succeeded(_) => ResultCode::Completed,
            TransferOutcome::Cancelled => ResultCode::Cancelled,
            TransferOutcome::Failed(_) => ResultCode::Error,
        }
    }

    pub fn exit_code(self) -> i32 {
        self as i32
    }

    pub fn is_completed(self) -> bool {
        self == ResultCode::Completed
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultCode::Unknown => "UNKNOWN",
            ResultCode::Completed => "COMPLETED",
            ResultCode::Cancelled => "CANCELLED",
            ResultCode::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// State of one fetch from start to terminal outcome.
#[derive(Debug)]
pub(crate) struct TransferSession {
    target: String,
    timeout: Duration,
    code: ResultCode,
}

impl TransferSession {
    pub(crate) fn start(request: &TransferRequest<'_>) -> Self {
        tracing::debug!(
            url = %request.target,
            timeout_ms = request.timeout.as_millis() as u64,
            credential = request.credential.map(|c| c.user.as_str()),
            "session started"
        );
        Self {
            target: request.target.to_string(),
            timeout: request.timeout,
            code: ResultCode::Unknown,
        }
    }

    pub(crate) fn record(&mut self, code: ResultCode) {
        self.code = code;
    }

    /// The session's code; an unset code is reported as `Error`.
    pub(crate) fn finish(self) -> ResultCode {
        if self.code == ResultCode::Unknown {
            tracing::error!(url = %self.target, "operation ended without an outcome");
            return ResultCode::Error;
        }
        tracing::debug!(
            url = %self.target,
            timeout_ms = self.timeout.as_millis() as u64,
            result = %self.code,
            "session finished"
        );
        self.code
    }
}
