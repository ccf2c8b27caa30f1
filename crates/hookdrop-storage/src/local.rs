use crate::error::{StorageError, StorageResult};
use crate::keys::generate_session_dir_name;
use crate::paths::display_path;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage rooted at the uploads directory
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
}

/// A per-request directory under the uploads root
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDir {
    pub name: String,
    pub path: PathBuf,
}

/// An open file inside a session, written chunk by chunk
#[derive(Debug)]
pub struct FileSink {
    file: fs::File,
    path: PathBuf,
    bytes_written: u64,
}

impl FileSink {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StorageResult<()> {
        self.file.write_all(chunk).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Flush and sync; returns the path and the number of bytes written.
    pub async fn finish(mut self) -> StorageResult<(PathBuf, u64)> {
        self.file.flush().await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to flush file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        self.file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to sync file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok((self.path, self.bytes_written))
    }
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the uploads root if absent.
    ///
    /// # Arguments
    /// * `root` - Directory that receives session directories (e.g., "uploads")
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create uploads directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalStorage { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a fresh, server-named session directory.
    pub async fn create_session(&self) -> StorageResult<SessionDir> {
        let name = generate_session_dir_name();
        let path = self.root.join(&name);

        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create session directory {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(session = %name, path = %path.display(), "Upload session created");
        Ok(SessionDir { name, path })
    }

    /// Resolve a stored name inside a session, refusing anything that is not
    /// a plain file name.
    fn file_path(session: &SessionDir, stored_name: &str) -> StorageResult<PathBuf> {
        if stored_name.is_empty()
            || stored_name == "."
            || stored_name == ".."
            || stored_name.contains('/')
            || stored_name.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Stored name {:?} is not a plain file name",
                stored_name
            )));
        }
        Ok(session.path.join(stored_name))
    }

    /// Open a new file for streaming writes.
    pub async fn create_file(
        &self,
        session: &SessionDir,
        stored_name: &str,
    ) -> StorageResult<FileSink> {
        let path = Self::file_path(session, stored_name)?;
        let file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        Ok(FileSink {
            file,
            path,
            bytes_written: 0,
        })
    }

    /// Write `value` pretty-printed (two-space indent) and return its path.
    pub async fn write_json(
        &self,
        session: &SessionDir,
        stored_name: &str,
        value: &JsonValue,
    ) -> StorageResult<PathBuf> {
        let path = Self::file_path(session, stored_name)?;
        let body = serde_json::to_vec_pretty(value).map_err(|e| {
            StorageError::WriteFailed(format!("Failed to serialize JSON: {}", e))
        })?;
        let size = body.len();

        let start = std::time::Instant::now();
        fs::write(&path, body).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "JSON document saved"
        );
        Ok(path)
    }

    pub async fn read_to_string(&self, path: &Path) -> StorageResult<String> {
        fs::read_to_string(path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    pub async fn remove_file(&self, path: &Path) -> StorageResult<()> {
        fs::remove_file(path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })
    }

    /// Response form of a stored path (relative to the working directory).
    pub fn display_path(&self, path: &Path) -> String {
        display_path(path)
    }

    /// Readiness probe: the root exists, is a directory, and is not read-only.
    pub async fn check_writable(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        if metadata.permissions().readonly() {
            return Err(StorageError::ConfigError(format!(
                "{} is read-only",
                self.root.display()
            )));
        }
        Ok(())
    }
}
