//! # nrpti-policy: Record Visibility
//!
//! Pure functions deciding who may read and write each document:
//!
//! - [`VisibilityPolicy::base_roles`]: fixed administrative roles for the
//!   document's owning subsystem (master or one publication site).
//! - [`VisibilityPolicy::apply_public_release`]: conditional widening of a
//!   flavour's `read` list to `public`, with publication stamps.
//! - [`anonymity::is_anonymous_safe`]: whether the nested `issuedTo` data
//!   may be shown publicly. Strictly narrower than, and independent of,
//!   the parent document's public release.
//!
//! Nothing here touches the document store.

pub mod anonymity;
pub mod visibility;

pub use anonymity::{apply_anonymity, identifies_individual, is_anonymous_safe};
pub use visibility::{PolicyError, Subsystem, VisibilityPolicy};
