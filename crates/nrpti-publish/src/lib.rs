//! # nrpti-publish: Record Publication
//!
//! Writes one compliance record as a master document plus one flavour
//! document per public site, without a multi-document transaction:
//!
//! - [`FlavourOrchestrator`] builds the whole set in memory, links master
//!   and flavours both ways, writes everything concurrently and deletes the
//!   whole set again if any write fails.
//! - [`BuilderCatalog`] supplies the standard master and flavour builders
//!   for each record type. Custom builders are any type implementing
//!   [`MasterBuilder`] / [`FlavourBuilder`], closures included.
//! - [`PublishConfig`] reads the pipeline's environment configuration.
//!
//! Visibility decisions come from `nrpti-policy`, legislation descriptions
//! from `nrpti-legislation`, persistence from `nrpti-store`.

pub mod builder;
pub mod catalog;
pub mod config;
pub mod counters;
pub mod error;
pub mod input;
pub mod orchestrator;

pub use builder::{FlavourBuilder, FlavourBuilders, MasterBuilder};
pub use catalog::{BuilderCatalog, StandardFlavour, StandardMaster};
pub use config::{ConfigError, PublishConfig};
pub use error::{CompensationError, PublishError, Rollback, ValidationError};
pub use input::RecordInput;
pub use orchestrator::{FlavourOrchestrator, Publication};
