use thiserror::Error;

use nrpti_core::NrptiError;

/// Errors building a search request.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("unknown project selector: {0:?} (expected lngCanada, coastalGaslink or otherProjects)")]
    UnknownProject(String),

    #[error("page size {size} out of range 1..={max}")]
    InvalidPageSize { size: u32, max: u32 },

    #[error("invalid sort key: {0:?}")]
    InvalidSort(String),

    #[error(transparent)]
    Core(#[from] NrptiError),
}
