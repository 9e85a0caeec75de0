//! Destination arithmetic for `-P` (directory prefix) and `-O` (output file).

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use wget_core::FileTarget;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path\n\tprefix : {}\n\tdstfile: {}", .prefix.display(), .output.display())]
    OutsidePrefix { prefix: PathBuf, output: PathBuf },
}

/// Splits `-P`/`-O` into the download directory and an optional file name.
///
/// - neither: current directory, name from the response;
/// - `-O f` only: the directory holding `f`;
/// - `-P p -O f` with relative `f`: `p/f`;
/// - `-P p -O f` with absolute `f`: `f`, which must lie inside `p`.
///
/// Paths are compared component-wise after making them absolute against
/// `cwd` and folding `.` and `..`.
pub fn resolve_destination(
    cwd: &Path,
    prefix: Option<&Path>,
    output: Option<&Path>,
) -> Result<FileTarget, PathError> {
    match (prefix, output) {
        (None, None) => Ok(FileTarget::new(".")),
        (Some(prefix), None) => Ok(FileTarget::new(prefix)),
        (None, Some(output)) => Ok(split_output(output)),
        (Some(prefix), Some(output)) if !output.has_root() => {
            Ok(split_output(&prefix.join(output)))
        }
        (Some(prefix), Some(output)) => {
            let prefix = normalize(&cwd.join(prefix));
            let output = normalize(output);
            if output == prefix || !output.starts_with(&prefix) {
                return Err(PathError::OutsidePrefix { prefix, output });
            }
            Ok(split_output(&output))
        }
    }
}

/// `-x`: create the download directory and its parents.
pub fn create_destination_dir(target: &FileTarget) -> Result<()> {
    fs::create_dir_all(&target.dir)
        .with_context(|| format!("failed to create directory {}", target.dir.display()))?;
    tracing::debug!(dir = %target.dir.display(), "destination directory ready");
    Ok(())
}

fn split_output(output: &Path) -> FileTarget {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let target = FileTarget::new(dir);
    match output.file_name() {
        Some(name) => target.with_file_name(name),
        None => target,
    }
}

/// Lexically folds `.` and `..`; does not touch the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
