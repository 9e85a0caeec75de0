//! Parse HTTP response header lines into ResponseHead.

/// Headers of the final response of a transfer (after redirects).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code of the most recent status line (0 until one is seen).
    pub status: u32,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
    /// `Content-Type` value if present.
    pub content_type: Option<String>,
}

impl ResponseHead {
    /// True for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Feed one header line as received. Bytes that are not UTF-8 are read
    /// as ISO-8859-1, the legacy HTTP header charset.
    pub(crate) fn apply_raw_line(&mut self, data: &[u8]) {
        match std::str::from_utf8(data) {
            Ok(line) => self.apply_line(line),
            Err(_) => {
                let line: String = data.iter().map(|&b| char::from(b)).collect();
                self.apply_line(&line);
            }
        }
    }

    /// Feed one raw header line. A status line starts a new response, so
    /// headers from redirects and `100 Continue` do not leak into the final one.
    pub(crate) fn apply_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = ResponseHead {
                status: parse_status(line).unwrap_or(0),
                ..ResponseHead::default()
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                self.content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("content-disposition") {
                self.content_disposition = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("content-type") {
                self.content_type = Some(value.to_string());
            }
        }
    }
}

fn parse_status(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Parse collected header lines into ResponseHead.
#[cfg(test)]
pub(crate) fn parse_headers(lines: &[&str]) -> ResponseHead {
    let mut head = ResponseHead::default();
    for line in lines {
        head.apply_line(line);
    }
    head
}
