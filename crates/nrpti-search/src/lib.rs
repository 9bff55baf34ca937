//! # nrpti-search: Search Filters
//!
//! Builds the filter documents the external query layer runs against the
//! record store. The interesting part is the project restriction: a small
//! closed set of named projects plus an `otherProjects` bucket, which turns
//! into either a membership (`$or`) or a negated membership (`$nor`) clause
//! over `_epicProjectId`. See [`filter::build_filter`] for the rules.

pub mod error;
pub mod filter;
pub mod project;
pub mod query;

pub use error::SearchError;
pub use filter::{build_filter, ProjectFilter, PROJECT_FIELD};
pub use project::{ProjectId, ProjectSelector};
pub use query::SearchQuery;
