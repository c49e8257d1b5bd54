//! Filesystem-backed object store: containers are directories under a root.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

use super::{ObjectStore, StoreError};

/// Object store over a local directory tree. Container `c`, object `a/b.txt`
/// maps to `<root>/c/a/b.txt`; parent directories are created on write.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, container: &str, name: &str) -> PathBuf {
        self.root.join(container).join(name)
    }

    fn map_err(err: io::Error, name: &str) -> StoreError {
        match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied(name.to_string()),
            _ => StoreError::Io(err),
        }
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn read(&self, container: &str, name: &str) -> Result<Vec<u8>, StoreError> {
        tokio::fs::read(self.object_path(container, name))
            .await
            .map_err(|e| Self::map_err(e, name))
    }

    async fn write(&self, container: &str, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.object_path(container, name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::map_err(e, name))?;
        }
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Self::map_err(e, name))
    }

    async fn delete(&self, container: &str, name: &str) -> Result<(), StoreError> {
        tokio::fs::remove_file(self.object_path(container, name))
            .await
            .map_err(|e| Self::map_err(e, name))
    }
}
