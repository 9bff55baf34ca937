//! # Project Selectors
//!
//! The closed universe of projects a search can be narrowed to. Two named
//! projects carry a fixed store id; `otherProjects` stands for every record
//! attached to neither of them.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SearchError;

/// Store id of a named project, as held in a record's `_epicProjectId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(&'static str);

impl ProjectId {
    pub const LNG_CANADA: ProjectId = ProjectId("588511d0aaecd9001b826192");
    pub const COASTAL_GASLINK: ProjectId = ProjectId("588510cdaaecd9001b815f84");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// One selectable project bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectSelector {
    LngCanada,
    CoastalGaslink,
    /// Every record not attached to a named project.
    OtherProjects,
}

impl ProjectSelector {
    /// The named projects, in filter output order.
    pub const KNOWN: [ProjectSelector; 2] = [Self::LngCanada, Self::CoastalGaslink];

    pub fn all() -> &'static [ProjectSelector] {
        &[Self::LngCanada, Self::CoastalGaslink, Self::OtherProjects]
    }

    /// Query parameter spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LngCanada => "lngCanada",
            Self::CoastalGaslink => "coastalGaslink",
            Self::OtherProjects => "otherProjects",
        }
    }

    /// The store id for a named project; `None` for the catch-all.
    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            Self::LngCanada => Some(ProjectId::LNG_CANADA),
            Self::CoastalGaslink => Some(ProjectId::COASTAL_GASLINK),
            Self::OtherProjects => None,
        }
    }

    /// Parse a comma-separated query parameter such as
    /// `"lngCanada,otherProjects"`. Empty items are skipped, duplicates
    /// collapse, unknown names are rejected.
    pub fn parse_list(raw: &str) -> Result<BTreeSet<ProjectSelector>, SearchError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl std::fmt::Display for ProjectSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectSelector {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|sel| sel.as_str() == s)
            .ok_or_else(|| SearchError::UnknownProject(s.to_string()))
    }
}
