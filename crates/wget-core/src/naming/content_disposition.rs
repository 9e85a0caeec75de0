//! Content-Disposition header parsing (filename and filename*).

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports:
/// - `filename="value"` (quoted; strips quotes and unescapes)
/// - `filename=value` (token)
/// - `filename*=UTF-8''percent-encoded` (RFC 5987; decoded)
///
/// Parameters after the filename (`; size=...`) are ignored. If both
/// `filename` and `filename*` exist, `filename*` takes precedence.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let mut filename_from_token: Option<String> = None;

    for param in split_params(header_value.trim()) {
        let Some((name, v)) = param.trim().split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let v = v.trim();

        if name == "filename*" {
            // charset'language'value
            let mut parts = v.splitn(3, '\'');
            if let (Some(_charset), Some(_lang), Some(encoded)) =
                (parts.next(), parts.next(), parts.next())
            {
                let decoded = percent_decode(unquote(encoded).as_str());
                if !decoded.is_empty() {
                    return Some(decoded);
                }
            }
        }

        if name == "filename" {
            let unquoted = unquote(v);
            if !unquoted.is_empty() {
                filename_from_token = Some(unquoted);
            }
        }
    }

    filename_from_token
}

/// Splits on `;` outside quoted strings, so `filename="a;b"` stays whole.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

/// Strips surrounding double quotes and unescapes `\"` and `\\`. An
/// unterminated quote loses its opening `"`.
fn unquote(v: &str) -> String {
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        decode_quoted_filename(&v[1..v.len() - 1])
    } else if let Some(rest) = v.strip_prefix('"') {
        decode_quoted_filename(rest)
    } else {
        v.to_string()
    }
}

/// Decode backslash-escaped quotes in a quoted filename value.
fn decode_quoted_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Lenient percent-decode; malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
pub(super) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quoted() {
        let r = parse_content_disposition_filename("attachment; filename=\"report.csv\"");
        assert_eq!(r.as_deref(), Some("report.csv"));
    }

    #[test]
    fn parse_token() {
        let r = parse_content_disposition_filename("attachment; filename=report.pdf");
        assert_eq!(r.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn trailing_parameters_are_discarded() {
        let r = parse_content_disposition_filename(
            "attachment; filename=\"report.csv\"; creation-date=\"Wed, 12 Feb 1997\"",
        );
        assert_eq!(r.as_deref(), Some("report.csv"));
    }

    #[test]
    fn semicolon_inside_quotes_is_part_of_name() {
        let r = parse_content_disposition_filename("attachment; filename=\"a;b.txt\"; size=4");
        assert_eq!(r.as_deref(), Some("a;b.txt"));
    }

    #[test]
    fn unterminated_quote_is_stripped() {
        let r = parse_content_disposition_filename("attachment; filename=\"report.csv");
        assert_eq!(r.as_deref(), Some("report.csv"));
    }

    #[test]
    fn params_split_outside_quotes_only() {
        assert_eq!(
            split_params(r#"attachment; filename="x\";y"; size=1"#),
            vec!["attachment", r#" filename="x\";y""#, " size=1"]
        );
    }

    #[test]
    fn escaped_quote_inside_value() {
        let r = parse_content_disposition_filename(r#"attachment; filename="a\"b.txt""#);
        assert_eq!(r.as_deref(), Some("a\"b.txt"));
    }

    #[test]
    fn parse_filename_star_utf8() {
        let r = parse_content_disposition_filename("attachment; filename*=UTF-8''caf%C3%A9.txt");
        assert_eq!(r.as_deref(), Some("café.txt"));
    }

    #[test]
    fn parse_filename_star_precedence() {
        let r = parse_content_disposition_filename(
            "attachment; filename=\"fallback.bin\"; filename*=UTF-8''real%20name.dat",
        );
        assert_eq!(r.as_deref(), Some("real name.dat"));
    }

    #[test]
    fn missing_filename() {
        assert_eq!(parse_content_disposition_filename("inline"), None);
        assert_eq!(parse_content_disposition_filename("attachment; filename=\"\""), None);
    }

    #[test]
    fn percent_decode_keeps_malformed_escapes() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("a%zzb"), "a%zzb");
        assert_eq!(percent_decode("a%2"), "a%2");
        assert_eq!(percent_decode("%41%42"), "AB");
    }
}
