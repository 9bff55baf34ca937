//! Publication errors.
//!
//! Validation failures surface before anything is written. Persistence
//! failures always carry the outcome of the compensating delete, so an
//! operator can tell a clean rollback from one that left orphans behind.

use thiserror::Error;

use nrpti_core::{FlavourKind, RecordId, RecordType};
use nrpti_policy::PolicyError;
use nrpti_store::StoreError;

/// Input or actor rejected by a builder.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error(transparent)]
    Unauthorized(#[from] PolicyError),

    #[error("cannot decode {target} input: {reason}")]
    Decode { target: String, reason: String },

    #[error("{record_type} records cannot be published as {flavour}")]
    UnsupportedFlavour {
        record_type: RecordType,
        flavour: FlavourKind,
    },
}

impl ValidationError {
    pub(crate) fn decode(target: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

/// A compensating delete that did not complete.
#[derive(Error, Debug)]
#[error("compensating delete failed; {} document(s) may remain: {source}", orphans.len())]
pub struct CompensationError {
    /// Documents known to have been written and possibly not deleted.
    pub orphans: Vec<RecordId>,
    pub source: StoreError,
}

/// Outcome of rolling back a failed persistence phase.
#[derive(Debug)]
pub enum Rollback {
    /// Every document of the operation is gone.
    Clean { deleted: u64 },
    /// Cleanup failed; the listed documents need reconciling.
    Orphaned(CompensationError),
}

impl Rollback {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean { .. })
    }

    /// Ids left behind, empty for a clean rollback.
    pub fn orphans(&self) -> &[RecordId] {
        match self {
            Self::Clean { .. } => &[],
            Self::Orphaned(err) => &err.orphans,
        }
    }

    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Clean { .. } => "clean",
            Self::Orphaned(_) => "orphaned",
        }
    }
}

impl std::fmt::Display for Rollback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean { deleted } => write!(f, "rolled back cleanly ({deleted} deleted)"),
            Self::Orphaned(err) => write!(f, "rolled back with residual orphans: {err}"),
        }
    }
}

/// Errors from a publication operation.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Rejected before any write.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A store write failed. The original failure is kept; the rollback
    /// outcome never replaces it.
    #[error("persistence failed: {source}; {rollback}")]
    Persistence {
        source: StoreError,
        rollback: Rollback,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The detached persistence task did not complete.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PublishError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn rollback(&self) -> Option<&Rollback> {
        match self {
            Self::Persistence { rollback, .. } => Some(rollback),
            _ => None,
        }
    }
}
