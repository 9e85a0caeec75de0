//! Destination filename resolution.
//!
//! Precedence: explicit name from the caller, then the `Content-Disposition`
//! filename, then the last segment of the URL path, then `index.html`.
//! Names that come from the server or the URL are reduced to a single safe
//! path component; explicit names are taken as given.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

use std::path::{Path, PathBuf};
use url::Url;

/// Filename used when neither the response nor the URL yields one.
pub const DEFAULT_FILENAME: &str = "index.html";

/// Derives a safe filename from the response's `Content-Disposition` value
/// (if present and parseable) or the URL path.
///
/// # Examples
///
/// - `https://example.test/data.bin`, no header → `"data.bin"`
/// - any URL with `attachment; filename="report.csv"` → `"report.csv"`
pub fn derive_filename(url: &Url, content_disposition: Option<&str>) -> String {
    let from_header = content_disposition
        .and_then(parse_content_disposition_filename)
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| is_usable(s));
    if let Some(name) = from_header {
        return name;
    }

    filename_from_url_path(url)
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| is_usable(s))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Resolves the name to save under: `explicit` wins, otherwise [`derive_filename`].
pub fn resolve_filename(
    explicit: Option<&Path>,
    content_disposition: Option<&str>,
    url: &Url,
) -> PathBuf {
    match explicit {
        Some(name) => name.to_path_buf(),
        None => PathBuf::from(derive_filename(url, content_disposition)),
    }
}

/// Places `name` in `dir` unless it is already absolute or rooted.
pub fn final_path(dir: &Path, name: &Path) -> PathBuf {
    if name.is_absolute() || name.has_root() {
        name.to_path_buf()
    } else {
        dir.join(name)
    }
}

fn is_usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}
