//! # Roles and Role Sets
//!
//! The closed vocabulary of actor roles, and `RoleSet`, the ordered,
//! duplicate-free role list stored in every document's `read` and `write`
//! fields (and in the nested `issuedTo` sub-object).
//!
//! ## Role Families
//!
//! | Family | Roles |
//! |--------|-------|
//! | Global admin | `sysadmin`, `admin` |
//! | Site admin | `admin:lng`, `admin:nrced`, `admin:bcmi` |
//! | Agency limited admin | `admin:wf`, `admin:flnro`, `admin:flnr-nro`, `admin:agri`, `admin:env-epd`, `admin:env-cos`, `admin:env-bcparks`, `admin:alc`, `admin:wlrs` |
//! | Sentinel | `public` |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::NrptiError;

/// Every role identifier known to the publication subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// System administrator. Full access everywhere.
    #[serde(rename = "sysadmin")]
    SysAdmin,
    /// Legacy global administrator.
    #[serde(rename = "admin")]
    Admin,
    /// LNG public site administrator.
    #[serde(rename = "admin:lng")]
    AdminLng,
    /// NRCED public site administrator.
    #[serde(rename = "admin:nrced")]
    AdminNrced,
    /// BC Mine Information site administrator.
    #[serde(rename = "admin:bcmi")]
    AdminBcmi,
    /// BC Wildfire Service limited admin.
    #[serde(rename = "admin:wf")]
    AdminWf,
    /// Forests, Lands and Natural Resource Operations limited admin.
    #[serde(rename = "admin:flnro")]
    AdminFlnro,
    /// Natural Resource Officers limited admin.
    #[serde(rename = "admin:flnr-nro")]
    AdminFlnrNro,
    /// Agriculture limited admin.
    #[serde(rename = "admin:agri")]
    AdminAgri,
    /// Environmental Protection Division limited admin.
    #[serde(rename = "admin:env-epd")]
    AdminEnvEpd,
    /// Conservation Officer Service limited admin.
    #[serde(rename = "admin:env-cos")]
    AdminEnvCos,
    /// BC Parks limited admin.
    #[serde(rename = "admin:env-bcparks")]
    AdminEnvBcParks,
    /// Agricultural Land Commission limited admin.
    #[serde(rename = "admin:alc")]
    AdminAlc,
    /// Water, Land and Resource Stewardship limited admin.
    #[serde(rename = "admin:wlrs")]
    AdminWlrs,
    /// Anonymous public readers.
    #[serde(rename = "public")]
    Public,
}

impl Role {
    /// Roles that grant unrestricted administrative access.
    pub const GLOBAL_ADMIN: &'static [Role] = &[Role::SysAdmin, Role::Admin];

    /// Per-agency limited-admin roles. These may manage NRCED records only.
    pub const LIMITED_ADMIN: &'static [Role] = &[
        Role::AdminWf,
        Role::AdminFlnro,
        Role::AdminFlnrNro,
        Role::AdminAgri,
        Role::AdminEnvEpd,
        Role::AdminEnvCos,
        Role::AdminEnvBcParks,
        Role::AdminAlc,
        Role::AdminWlrs,
    ];

    /// All roles in declaration order.
    pub fn all() -> &'static [Role] {
        &[
            Self::SysAdmin,
            Self::Admin,
            Self::AdminLng,
            Self::AdminNrced,
            Self::AdminBcmi,
            Self::AdminWf,
            Self::AdminFlnro,
            Self::AdminFlnrNro,
            Self::AdminAgri,
            Self::AdminEnvEpd,
            Self::AdminEnvCos,
            Self::AdminEnvBcParks,
            Self::AdminAlc,
            Self::AdminWlrs,
            Self::Public,
        ]
    }

    /// The wire identifier for this role. Matches the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SysAdmin => "sysadmin",
            Self::Admin => "admin",
            Self::AdminLng => "admin:lng",
            Self::AdminNrced => "admin:nrced",
            Self::AdminBcmi => "admin:bcmi",
            Self::AdminWf => "admin:wf",
            Self::AdminFlnro => "admin:flnro",
            Self::AdminFlnrNro => "admin:flnr-nro",
            Self::AdminAgri => "admin:agri",
            Self::AdminEnvEpd => "admin:env-epd",
            Self::AdminEnvCos => "admin:env-cos",
            Self::AdminEnvBcParks => "admin:env-bcparks",
            Self::AdminAlc => "admin:alc",
            Self::AdminWlrs => "admin:wlrs",
            Self::Public => "public",
        }
    }

    /// Whether this role grants unrestricted administrative access.
    pub fn is_global_admin(&self) -> bool {
        Self::GLOBAL_ADMIN.contains(self)
    }

    /// Whether this is a per-agency limited-admin role.
    pub fn is_limited_admin(&self) -> bool {
        Self::LIMITED_ADMIN.contains(self)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = NrptiError;

    /// Parse a role from its wire identifier. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| NrptiError::UnknownRole(s.to_string()))
    }
}

// ─── RoleSet ─────────────────────────────────────────────────────────

/// Ordered, duplicate-free list of roles.
///
/// Membership tests treat the list as a set; iteration and serialization
/// preserve first-seen order. Deserializing a list with duplicates keeps the
/// first occurrence of each role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    /// An empty role set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a role set from a slice, dropping repeats.
    pub fn from_roles(roles: &[Role]) -> Self {
        roles.iter().copied().collect()
    }

    /// Append a role if absent. Returns `true` when the role was added.
    pub fn insert(&mut self, role: Role) -> bool {
        if self.0.contains(&role) {
            return false;
        }
        self.0.push(role);
        true
    }

    /// Append every role from `other` that is not already present.
    pub fn extend_from(&mut self, other: &RoleSet) {
        for role in other.iter() {
            self.insert(role);
        }
    }

    /// Remove a role. Returns `true` when the role was present.
    pub fn remove(&mut self, role: Role) -> bool {
        let before = self.0.len();
        self.0.retain(|r| *r != role);
        self.0.len() != before
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Whether any role in `roles` is present.
    pub fn contains_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.contains(*r))
    }

    /// Whether every role in `self` is also in `other`.
    pub fn is_subset_of(&self, other: &RoleSet) -> bool {
        self.0.iter().all(|r| other.contains(*r))
    }

    /// Whether the two sets share at least one role.
    pub fn intersects(&self, other: &RoleSet) -> bool {
        self.0.iter().any(|r| other.contains(*r))
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Role] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        let mut set = RoleSet::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a Role;
    type IntoIter = std::slice::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
