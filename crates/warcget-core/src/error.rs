//! Fatal job-level error taxonomy.
//!
//! Per-URL fetch failures never appear here; they are captured inside the
//! archive record as synthetic 599 responses. Only configuration, input
//! source, and final persist/delete failures escalate to job failure.

use crate::config::ConfigError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Missing/invalid configuration, rejected before any work starts.
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    /// The url-list object could not be read from the input container.
    #[error("reading url list {name}: {source}")]
    ListRead {
        name: String,
        #[source]
        source: StoreError,
    },
    /// The url-list object could not be decoded (e.g. gzip corruption).
    #[error("decoding url list {name}: {source}")]
    ListDecode {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// An archive object could not be written. Surfaced after the drain
    /// barrier so sibling tasks still reach a terminal state.
    #[error("writing archive object {name}: {source}")]
    Persist {
        name: String,
        #[source]
        source: StoreError,
    },
    /// The input object could not be deleted on completion.
    #[error("deleting input object {name}: {source}")]
    Delete {
        name: String,
        #[source]
        source: StoreError,
    },
}
