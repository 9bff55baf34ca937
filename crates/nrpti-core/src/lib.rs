//! # nrpti-core: Foundational Types for Record Publication
//!
//! Every other crate in the workspace depends on `nrpti-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `RecordId` for documents this
//!    subsystem allocates, `ObjectRef` for validated integration references
//!    into external systems. No bare strings for identifiers.
//!
//! 2. **Closed role vocabulary.** `Role` enumerates every administrative role
//!    and the `public` sentinel. `RoleSet` keeps first-seen order and never
//!    holds duplicates, so serialized role lists are reproducible.
//!
//! 3. **Single `RecordType` / `FlavourKind` pair.** One definition of which
//!    record types exist and which site flavours each supports. Exhaustive
//!    `match` everywhere.
//!
//! 4. **UTC-only timestamps** truncated to seconds.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `nrpti-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod actor;
pub mod citation;
pub mod document;
pub mod error;
pub mod identity;
pub mod record;
pub mod role;
pub mod temporal;

pub use actor::Actor;
pub use citation::LegislationCitation;
pub use document::{FlavourRecord, IssuedTo, IssuedToType, MasterRecord, RecordDocument, RecordFields};
pub use error::NrptiError;
pub use identity::{ObjectRef, RecordId};
pub use record::{FlavourKind, RecordType};
pub use role::{Role, RoleSet};
pub use temporal::Timestamp;
