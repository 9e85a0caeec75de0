//! Filename sanitization for names supplied by servers and URLs.

/// Longest single path component on common filesystems, in bytes.
const NAME_MAX: usize = 255;

/// Reduces a candidate filename to one safe path component.
///
/// Separators, NUL and control characters become `_`, runs of `_` collapse,
/// and leading/trailing spaces, dots and underscores are trimmed. The result
/// is cut to `NAME_MAX` bytes on a char boundary and may be empty.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    let trimmed = out.trim_matches(&[' ', '.', '_'][..]);
    truncate_on_boundary(trimmed, NAME_MAX).to_string()
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\0' | '/' | '\\') || c.is_control()
}

fn truncate_on_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let end = (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_slash_and_backslash() {
        assert_eq!(sanitize_filename("a/b\\c.txt"), "a_b_c.txt");
    }

    #[test]
    fn trims_dots_and_spaces() {
        assert_eq!(sanitize_filename("  ..  file.txt  ..  "), "file.txt");
    }

    #[test]
    fn keeps_inner_spaces() {
        assert_eq!(sanitize_filename("real name.dat"), "real name.dat");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_filename("file\x00name.txt"), "file_name.txt");
        assert_eq!(sanitize_filename("file\r\nname.txt"), "file_name.txt");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let out = sanitize_filename(&long);
        assert!(out.len() <= 255);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
