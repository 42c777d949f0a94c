use thiserror::Error;

use crate::connectors::credentials::CredentialKind;

/// Convenience result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Error type returned across the synchronization pipeline.
///
/// This is a single error enum shared by ingestion, normalization, and the
/// reconciliation engine. All variants are fatal for the current run; there is
/// no built-in retry.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration could not be loaded or deserialized.
    #[error("config error: {0}")]
    Config(#[from] figment::Error),

    /// Secret retrieval failed; aborts the run before any data access.
    #[error("credential error ({kind}): {message}")]
    Credential {
        kind: CredentialKind,
        message: String,
    },

    /// The raw snapshot object does not exist in the store.
    #[error("object not found: bucket='{bucket}' key='{key}'")]
    ObjectNotFound { bucket: String, key: String },

    /// Connection, existence-check, or write failure in the storage backend.
    #[error("storage error: {0}")]
    Storage(String),

    /// The dataset does not provide the columns the listing contract requires.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A committed column type cannot satisfy the listing contract.
    #[error("type mismatch in column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for SyncError {
    fn from(err: sqlx::Error) -> Self {
        SyncError::Storage(err.to_string())
    }
}
