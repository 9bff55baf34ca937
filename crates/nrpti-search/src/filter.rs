//! # Project Filter
//!
//! Turns a set of selected project buckets into at most one membership
//! clause over `_epicProjectId`.
//!
//! | Selected | Result |
//! |----------|--------|
//! | nothing | no filter |
//! | named projects only | `$or` over their ids |
//! | `otherProjects` only | `$nor` over every named id |
//! | `otherProjects` + one named project | `$nor` over the unselected id |
//! | `otherProjects` + every named project | no filter |
//!
//! Inclusion and exclusion are never produced together.

use serde::Serialize;
use serde_json::{json, Value};

use crate::project::{ProjectId, ProjectSelector};

/// Field holding a record's project reference.
pub const PROJECT_FIELD: &str = "_epicProjectId";

/// The project restriction of one search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    /// Records must reference one of these projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<Vec<ProjectId>>,
    /// Records must reference none of these projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_complement: Option<Vec<ProjectId>>,
}

impl ProjectFilter {
    /// No restriction.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.inclusion.is_none() && self.exclusion_complement.is_none()
    }

    /// The query clause, or `None` when unrestricted.
    pub fn to_clause(&self) -> Option<Value> {
        if let Some(ids) = &self.inclusion {
            return Some(json!({ "$or": membership(ids) }));
        }
        self.exclusion_complement
            .as_ref()
            .map(|ids| json!({ "$nor": membership(ids) }))
    }
}

fn membership(ids: &[ProjectId]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({ PROJECT_FIELD: id.as_str() }))
        .collect()
}

/// Build the project filter for the selected buckets.
pub fn build_filter<I>(selected: I) -> ProjectFilter
where
    I: IntoIterator<Item = ProjectSelector>,
{
    let mut other = false;
    let mut named = [false; ProjectSelector::KNOWN.len()];
    for sel in selected {
        match ProjectSelector::KNOWN.iter().position(|k| *k == sel) {
            Some(i) => named[i] = true,
            None => other = true,
        }
    }

    let ids_where = |want: bool| -> Vec<ProjectId> {
        ProjectSelector::KNOWN
            .iter()
            .zip(named)
            .filter(|(_, picked)| *picked == want)
            .filter_map(|(sel, _)| sel.project_id())
            .collect()
    };

    if !other {
        let included = ids_where(true);
        return if included.is_empty() {
            ProjectFilter::none()
        } else {
            ProjectFilter {
                inclusion: Some(included),
                exclusion_complement: None,
            }
        };
    }

    let excluded = ids_where(false);
    if excluded.is_empty() {
        ProjectFilter::none()
    } else {
        ProjectFilter {
            inclusion: None,
            exclusion_complement: Some(excluded),
        }
    }
}
