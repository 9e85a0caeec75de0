//! Temp-file staging and promotion to the final name.
//!
//! A download is written to a randomly named `.XXXXXXXX.wgettmp` file in the
//! destination directory and only moved to its final name once the transfer
//! succeeded. The temp file is removed when the `StagedFile` is dropped
//! without being promoted.
//!
//! Promotion deletes any existing file at the final path and then renames.
//! This is not atomic: a crash between the delete and the rename leaves no
//! file under the final name.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Temporary file suffix used before promotion.
pub const TEMP_SUFFIX: &str = ".wgettmp";

const TEMP_PREFIX: &str = ".";
const TEMP_RAND_CHARS: usize = 8;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create temporary file in {}", .dir.display())]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to flush {}", .path.display())]
    Sync {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove existing {}", .path.display())]
    RemoveExisting {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move {} to {}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Exclusively owned temp file for one download.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    /// Create a new temp file inside `dir`.
    ///
    /// Candidate names are random; creation is exclusive (`O_EXCL`) and a
    /// new name is drawn whenever a candidate already exists. `dir` must
    /// exist.
    pub fn create_in(dir: &Path) -> Result<Self, StagingError> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .rand_bytes(TEMP_RAND_CHARS)
            .tempfile_in(dir)
            .map_err(|source| StagingError::Create {
                dir: dir.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %file.path().display(), "staging file created");
        Ok(StagedFile { file })
    }

    /// Path to the current temp file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Writable handle for streaming the body.
    pub fn file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }

    /// Move the temp file to `final_path`, replacing whatever is there.
    ///
    /// On error the temp file is still removed.
    pub fn promote(self, final_path: &Path) -> Result<(), StagingError> {
        let temp_path = self.path().to_path_buf();
        self.file
            .as_file()
            .sync_all()
            .map_err(|source| StagingError::Sync {
                path: temp_path.clone(),
                source,
            })?;

        match fs::remove_file(final_path) {
            Ok(()) => {
                tracing::debug!(path = %final_path.display(), "removed existing file")
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StagingError::RemoveExisting {
                    path: final_path.to_path_buf(),
                    source,
                })
            }
        }

        self.file
            .persist(final_path)
            .map_err(|e| StagingError::Rename {
                from: temp_path,
                to: final_path.to_path_buf(),
                source: e.error,
            })?;
        Ok(())
    }

    /// Delete the temp file now. Errors are ignored; cleanup is best-effort.
    pub fn discard(self) {
        let path = self.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::debug!(path = %path.display(), "temp file cleanup failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect()
    }

    #[test]
    fn created_in_requested_dir_with_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedFile::create_in(dir.path()).unwrap();
        assert_eq!(staged.path().parent(), Some(dir.path()));
        assert!(staged.path().to_string_lossy().ends_with(TEMP_SUFFIX));
        assert!(staged.path().exists());
    }

    #[test]
    fn names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = StagedFile::create_in(dir.path()).unwrap();
        let b = StagedFile::create_in(dir.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn missing_dir_is_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StagedFile::create_in(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, StagingError::Create { .. }));
    }

    #[test]
    fn promote_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("out.bin");
        fs::write(&final_path, b"old contents").unwrap();

        let mut staged = StagedFile::create_in(dir.path()).unwrap();
        staged.file_mut().write_all(b"new").unwrap();
        let temp_path = staged.path().to_path_buf();
        staged.promote(&final_path).unwrap();

        assert!(!temp_path.exists());
        assert_eq!(fs::read(&final_path).unwrap(), b"new");
        assert!(temp_files(dir.path()).is_empty());
    }

    #[test]
    fn failed_promotion_removes_temp() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the final path cannot be removed as a file.
        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), b"x").unwrap();

        let staged = StagedFile::create_in(dir.path()).unwrap();
        let err = staged.promote(&blocked).unwrap_err();
        assert!(matches!(err, StagingError::RemoveExisting { .. }));
        assert!(temp_files(dir.path()).is_empty());
        assert!(blocked.join("keep").exists());
    }

    #[test]
    fn drop_and_discard_remove_temp() {
        let dir = tempfile::tempdir().unwrap();
        {
            let _staged = StagedFile::create_in(dir.path()).unwrap();
        }
        StagedFile::create_in(dir.path()).unwrap().discard();
        assert!(temp_files(dir.path()).is_empty());
    }
}
