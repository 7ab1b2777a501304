//! Scoped on-disk copy of a fetched page.

use std::path::{Path, PathBuf};

use reqwest::Response;
use tempfile::NamedTempFile;
use tracing::debug;

use super::ProcessError;
use crate::download::{DownloadError, stream_to_file};

/// A fetched page body held in a temporary file.
///
/// The file is deleted when the snapshot is dropped, on every exit path,
/// unless [`retain`](Self::retain) renames it first.
#[derive(Debug)]
pub struct PageSnapshot {
    file: NamedTempFile,
}

impl PageSnapshot {
    /// Creates an empty snapshot file inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::Snapshot`] if the file cannot be created.
    pub fn create_in(dir: &Path) -> Result<Self, ProcessError> {
        let file = tempfile::Builder::new()
            .prefix(".page-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| ProcessError::snapshot(dir, e))?;
        debug!(path = %file.path().display(), "created page snapshot");
        Ok(Self { file })
    }

    /// Streams a response body into the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the stream or write failure as a [`DownloadError`].
    pub async fn write_response(
        &self,
        response: Response,
        url: &str,
    ) -> Result<u64, DownloadError> {
        let std_file = self
            .file
            .as_file()
            .try_clone()
            .map_err(|e| DownloadError::io(self.file.path(), e))?;
        let mut file = tokio::fs::File::from_std(std_file);
        stream_to_file(&mut file, response, url, self.file.path()).await
    }

    /// Reads the whole snapshot back into memory.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::Snapshot`] on read failure.
    pub async fn read(&self) -> Result<Vec<u8>, ProcessError> {
        tokio::fs::read(self.file.path())
            .await
            .map_err(|e| ProcessError::snapshot(self.file.path(), e))
    }

    /// Renames the snapshot to `target`, keeping it on disk.
    ///
    /// On failure the temporary file is deleted.
    ///
    /// # Errors
    ///
    /// Returns the rename error.
    pub fn retain(self, target: &Path) -> Result<PathBuf, std::io::Error> {
        match self.file.persist(target) {
            Ok(_) => Ok(target.to_path_buf()),
            Err(persist_error) => {
                // Dropping the returned temp file removes it.
                drop(persist_error.file);
                Err(persist_error.error)
            }
        }
    }
}
