//! # Visibility Policy
//!
//! Baseline roles per owning subsystem, public release of flavours, and the
//! write check applied before a flavour is built.
//!
//! ## Baseline Roles
//!
//! | Subsystem | `read` / `write` | `issuedTo.read` / `issuedTo.write` |
//! |-----------|------------------|------------------------------------|
//! | Master | every administrative role | `sysadmin` + site admins |
//! | LNG | `sysadmin`, `admin:lng` | `sysadmin`, `admin:lng` |
//! | NRCED | `sysadmin`, `admin:nrced`, agency limited admins | `sysadmin`, `admin:nrced` |
//! | BCMI | `sysadmin`, `admin:bcmi` | `sysadmin`, `admin:bcmi` |
//!
//! `write` always equals the baseline; only `read` is ever widened (to
//! `public`), so `write ⊆ read` holds for every document built here.
//! `admin` is accepted as a global admin when authorizing but is never
//! stamped onto documents.

use thiserror::Error;

use nrpti_core::{Actor, FlavourKind, FlavourRecord, Role, RoleSet, Timestamp};

/// The subsystem that owns a document and therefore fixes its baseline roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Master,
    Flavour(FlavourKind),
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Master => f.write_str("master"),
            Self::Flavour(kind) => write!(f, "{kind}"),
        }
    }
}

/// Errors from policy checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The actor holds none of the roles allowed to write this subsystem.
    #[error("{actor:?} lacks a role permitted to write {subsystem} records (requires one of: {required})")]
    Unauthorized {
        actor: String,
        subsystem: Subsystem,
        required: String,
    },
}

/// Role policy for one owning subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityPolicy {
    subsystem: Subsystem,
}

impl VisibilityPolicy {
    pub fn new(subsystem: Subsystem) -> Self {
        Self { subsystem }
    }

    pub fn master() -> Self {
        Self::new(Subsystem::Master)
    }

    pub fn for_flavour(kind: FlavourKind) -> Self {
        Self::new(Subsystem::Flavour(kind))
    }

    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    /// Baseline `read` roles, which are also the `write` roles.
    pub fn base_roles(&self) -> RoleSet {
        let mut roles = RoleSet::from_roles(&[Role::SysAdmin]);
        match self.subsystem {
            Subsystem::Master => {
                roles.extend_from(&RoleSet::from_roles(&[
                    Role::AdminLng,
                    Role::AdminNrced,
                    Role::AdminBcmi,
                ]));
                roles.extend_from(&RoleSet::from_roles(Role::LIMITED_ADMIN));
            }
            Subsystem::Flavour(FlavourKind::Lng) => {
                roles.insert(Role::AdminLng);
            }
            Subsystem::Flavour(FlavourKind::Nrced) => {
                roles.insert(Role::AdminNrced);
                roles.extend_from(&RoleSet::from_roles(Role::LIMITED_ADMIN));
            }
            Subsystem::Flavour(FlavourKind::Bcmi) => {
                roles.insert(Role::AdminBcmi);
            }
        }
        roles
    }

    /// Roles that may write documents of this subsystem.
    pub fn writer_roles(&self) -> RoleSet {
        self.base_roles()
    }

    /// Baseline roles for the nested `issuedTo` sub-object. Agency limited
    /// admins never see personal details.
    pub fn issued_to_roles(&self) -> RoleSet {
        self.base_roles()
            .iter()
            .filter(|r| !r.is_limited_admin())
            .collect()
    }

    /// Check that `actor` may write documents of this subsystem.
    ///
    /// Global admins always pass; anyone else needs a writer role.
    pub fn authorize(&self, actor: &Actor) -> Result<(), PolicyError> {
        if actor.is_global_admin() || actor.roles().intersects(&self.writer_roles()) {
            return Ok(());
        }
        let required = self
            .writer_roles()
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Err(PolicyError::Unauthorized {
            actor: actor.display_name().to_string(),
            subsystem: self.subsystem,
            required,
        })
    }

    /// Widen a flavour's `read` list to `public` when release is requested.
    ///
    /// Idempotent: a flavour already readable by `public` keeps its original
    /// publication stamps. `write` is never touched.
    pub fn apply_public_release(
        &self,
        doc: &mut FlavourRecord,
        actor: &Actor,
        release_requested: bool,
    ) {
        self.apply_public_release_at(doc, actor, release_requested, Timestamp::now());
    }

    /// [`apply_public_release`](Self::apply_public_release) with an explicit clock.
    pub fn apply_public_release_at(
        &self,
        doc: &mut FlavourRecord,
        actor: &Actor,
        release_requested: bool,
        now: Timestamp,
    ) {
        if !release_requested {
            return;
        }
        if doc.read.insert(Role::Public) {
            doc.date_published = Some(now);
            doc.published_by = Some(actor.display_name().to_string());
            tracing::debug!(record_id = %doc.id, schema = %doc.schema_name, "released to public");
        }
    }
}
