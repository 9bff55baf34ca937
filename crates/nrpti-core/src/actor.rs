//! # Actor
//!
//! The caller of a publication operation, as resolved by the surrounding
//! authentication layer. This crate never validates credentials; it only
//! consumes the display name and the role list already resolved upstream.

use crate::role::{Role, RoleSet};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    display_name: String,
    roles: RoleSet,
}

impl Actor {
    pub fn new(display_name: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            display_name: display_name.into(),
            roles,
        }
    }

    /// Build an actor from raw role strings supplied by the auth layer.
    ///
    /// Role strings outside the known vocabulary carry no grants here and
    /// are dropped.
    pub fn from_role_strings<I, S>(display_name: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roles = roles
            .into_iter()
            .filter_map(|s| s.as_ref().trim().parse::<Role>().ok())
            .collect();
        Self::new(display_name, roles)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    /// Whether the actor holds `sysadmin` or `admin`.
    pub fn is_global_admin(&self) -> bool {
        self.roles.iter().any(|r| r.is_global_admin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_strings_are_dropped() {
        let actor = Actor::from_role_strings("Jo", ["admin:lng", "idir-user", " sysadmin "]);
        assert_eq!(actor.roles().as_slice(), &[Role::AdminLng, Role::SysAdmin]);
        assert_eq!(actor.display_name(), "Jo");
    }

    #[test]
    fn global_admin_detection() {
        assert!(Actor::from_role_strings("a", ["admin"]).is_global_admin());
        assert!(Actor::from_role_strings("a", ["sysadmin"]).is_global_admin());
        assert!(!Actor::from_role_strings("a", ["admin:nrced"]).is_global_admin());
        assert!(!Actor::from_role_strings("a", Vec::<String>::new()).is_global_admin());
    }
}
