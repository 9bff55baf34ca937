use thiserror::Error;

use nrpti_core::RecordId;

/// Errors from a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A document with this id already exists.
    #[error("document {0} already exists")]
    Duplicate(RecordId),

    /// A stored body could not be decoded as the requested document type.
    #[error("document {id} is corrupt: {reason}")]
    Corrupt { id: RecordId, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend refused or failed the operation for a non-database reason.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
