//! # Error Types
//!
//! Errors raised while constructing core values from untrusted input:
//! identifiers, role names, record type names, and timestamps.

use thiserror::Error;

/// Top-level error type for core value construction.
#[derive(Error, Debug)]
pub enum NrptiError {
    /// An identifier did not match the expected format.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A role string is not part of the role vocabulary.
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// A record type or schema name is not part of the catalog.
    #[error("unknown record type: {0:?}")]
    UnknownRecordType(String),

    /// A flavour suffix is not one of the publication sites.
    #[error("unknown flavour: {0:?}")]
    UnknownFlavour(String),

    /// A timestamp could not be parsed or was not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
