//! Durable object store interface.
//!
//! The pipeline reads its url-list from one container and writes archive
//! objects into another; both sides go through [`ObjectStore`]. Writes to
//! distinct keys are independent, so tasks persist concurrently with no
//! cross-task coordination.

mod fs;

pub use fs::FsStore;

use async_trait::async_trait;

/// Errors from the durable object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object {0:?} not found")]
    NotFound(String),
    #[error("permission denied for object {0:?}")]
    PermissionDenied(String),
    #[error("store i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Object store collaborator: named byte blobs grouped into containers.
/// Object names may contain `/` path segments.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Reads the full content of `name` in `container`.
    async fn read(&self, container: &str, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Writes `data` as `name` in `container`, replacing any existing object.
    async fn write(&self, container: &str, name: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Deletes `name` from `container`. Deleting a missing object is
    /// `StoreError::NotFound`.
    async fn delete(&self, container: &str, name: &str) -> Result<(), StoreError>;
}
