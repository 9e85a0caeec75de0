//! Filename extraction from URL path.

use url::Url;

use super::content_disposition::percent_decode;

/// Extracts the last path segment from a URL for use as a filename hint,
/// percent-decoded (`my%20file.txt` → `my file.txt`).
///
/// Returns `None` if the path is empty, ends in `/`, or is `.`/`..`.
pub fn filename_from_url_path(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let decoded = percent_decode(segment);
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded)
}
