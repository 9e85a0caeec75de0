//! Progress reporting for transfers (bytes received, expected total).

use std::fmt;

/// Snapshot of transfer progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Body bytes delivered to the sink so far.
    pub received: u64,
    /// Expected body size from `Content-Length`; `None` when the server did
    /// not announce one (chunked or close-delimited bodies).
    pub total: Option<u64>,
}

/// Renders as `downloading: <received> <total>`; the total is left blank when unknown.
impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "downloading: {} ", self.received)?;
        if let Some(total) = self.total {
            write!(f, "{}", total)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_known_total() {
        let p = Progress {
            received: 512,
            total: Some(2048),
        };
        assert_eq!(p.to_string(), "downloading: 512 2048");
    }

    #[test]
    fn unknown_total_is_blank_not_zero() {
        let p = Progress {
            received: 10,
            total: None,
        };
        assert_eq!(p.to_string(), "downloading: 10 ");
    }

    #[test]
    fn empty_body_with_known_total() {
        let p = Progress {
            received: 0,
            total: Some(0),
        };
        assert_eq!(p.to_string(), "downloading: 0 0");
    }
}
