//! # nrpti-legislation: Legislation Descriptions
//!
//! Resolves the legislation citation on a compliance record to the canonical
//! description shown on the public sites. The reference table is a static,
//! variably deep tree keyed by record type, act, regulation, section,
//! subsection and paragraph. A bundled copy ships with the crate and can be
//! replaced from a YAML file at startup.
//!
//! Lookups are pure and infallible: an unknown citation yields `None`.

pub mod acts;
pub mod error;
pub mod resolver;
pub mod table;

pub use acts::{ActCodeMap, ActIndex, VerbatimActs};
pub use error::LegislationError;
pub use resolver::LegislationResolver;
pub use table::{ReferenceTable, TableNode};
