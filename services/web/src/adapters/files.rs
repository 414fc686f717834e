//! services/web/src/adapters/files.rs
//!
//! The local-disk implementation of the `FileStore` port. Uploaded files live
//! flat inside one directory, named by their sanitized filename.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use study_hub_core::filename::is_safe_stored_name;
use study_hub_core::ports::{FileStore, PortError, PortResult};

/// Stores uploads as plain files under `root`.
#[derive(Clone, Debug)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> PortResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PortError::Unexpected(format!("{}: {}", self.root.display(), e)))
    }

    /// Resolves `filename` inside the root, refusing anything that could
    /// point outside of it.
    fn path_for(&self, filename: &str) -> PortResult<PathBuf> {
        if !is_safe_stored_name(filename) {
            return Err(PortError::InvalidInput(format!(
                "'{}' is not a valid stored filename",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> PortResult<()> {
        let path = self.path_for(filename)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PortError::Unexpected(format!("{}: {}", path.display(), e)))
    }

    async fn read(&self, filename: &str) -> PortResult<Vec<u8>> {
        let path = self.path_for(filename)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => PortError::NotFound(filename.to_string()),
            _ => PortError::Unexpected(format!("{}: {}", path.display(), e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_overwrites_and_read_returns_latest() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        store.save("notes.txt", b"first").await.unwrap();
        store.save("notes.txt", b"second").await.unwrap();

        assert_eq!(store.read("notes.txt").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        let err = store.read("absent.pdf").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(name) if name == "absent.pdf"));
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("uploads"));
        store.ensure_root().await.unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();

        let err = store.read("../secret.txt").await.unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
        let err = store.save("../secret.txt", b"pwned").await.unwrap_err();
        assert!(matches!(err, PortError::InvalidInput(_)));
    }
}
