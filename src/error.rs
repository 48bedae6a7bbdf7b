//! Error taxonomy for ingestion runs. Every variant aborts the run; nothing is
//! recovered locally.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the pipeline.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Failures surfaced by a [`CommentStore`](crate::store::CommentStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing database could not be opened or prepared.
    #[error("store unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A read or write against an open store failed.
    #[error("store operation failed: {0}")]
    OperationFailed(#[from] rusqlite::Error),
}

/// Main error type for an ingestion run.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A line could not be decoded into a comment record.
    #[error("malformed input at {origin}:{line_no}: {source}")]
    MalformedInput {
        origin: String,
        line_no: u64,
        #[source]
        source: serde_json::Error,
    },

    /// A parent identifier has no `_` separator (expected e.g. `t1_abc123`).
    #[error("malformed parent identifier: {0:?}")]
    MalformedIdentifier(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Opening or reading the input failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
