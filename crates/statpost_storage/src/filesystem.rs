//! Filesystem-based document storage.
//!
//! Each key maps to a file under a root directory, so a local run can keep
//! its state next to the binary instead of in a bucket.

use crate::{empty_document, parse_document, to_pretty_json};
use async_trait::async_trait;
use serde_json::Value;
use statpost_error::{StatpostResult, StorageError, StorageErrorKind};
use statpost_interface::DocumentStore;
use std::path::{Component, Path, PathBuf};

/// Filesystem storage backend.
///
/// Keys are relative paths below `root`:
///
/// ```text
/// ./state/
/// ├── statistics.json
/// └── previous_posts.json
/// ```
///
/// Writes go to a hidden temp file in the same directory and are renamed
/// into place, so a reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    /// Create a new filesystem store.
    ///
    /// Creates the root directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> StatpostResult<Self> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::info!(path = %root.display(), "Opened filesystem document store");
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key onto a path below the root.
    ///
    /// Rejects empty keys, absolute paths and any `..` component.
    fn path_for(&self, key: &str) -> StatpostResult<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.is_empty() || escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(key.to_string())).into());
        }
        Ok(self.root.join(relative))
    }

    fn temp_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.tmp", name))
    }
}

#[async_trait]
impl DocumentStore for FileSystemStore {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    async fn load(&self, key: &str) -> StatpostResult<Value> {
        let path = self.path_for(key)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Document not found, returning empty document");
                return Ok(empty_document());
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(StorageError::new(StorageErrorKind::PermissionDenied(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::Read(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        tracing::debug!(path = %path.display(), size = bytes.len(), "Read document");
        parse_document(key, &bytes)
    }

    #[tracing::instrument(skip(self, document), fields(root = %self.root.display()))]
    async fn save(&self, key: &str, document: &Value) -> StatpostResult<()> {
        let path = self.path_for(key)?;
        let bytes = to_pretty_json(key, document)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = Self::temp_path(&path);
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Write(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Write(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(path = %path.display(), size = bytes.len(), "Saved document");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
