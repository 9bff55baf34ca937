//! # Master and Flavour Documents
//!
//! One compliance event is stored as a `MasterRecord` plus zero or more
//! `FlavourRecord`s, one per public site the event is rendered for. Both
//! carry the shared business fields (`RecordFields`) and their own `read` /
//! `write` role lists. The nested `IssuedTo` sub-object has an independent,
//! narrower role list of its own.
//!
//! ## Linkage Invariant
//!
//! Every id in `MasterRecord::flavour_records` names a flavour written in the
//! same creation operation whose `master` back-reference (when the flavour
//! supports one) equals the master's id. The orchestrator in `nrpti-publish`
//! either writes the whole set or deletes it.
//!
//! Field names serialize in the camelCase layout used by the document store,
//! with `_id`, `_schemaName`, `_master` and the `_epic*` integration
//! references keeping their leading underscore.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::citation::LegislationCitation;
use crate::identity::{ObjectRef, RecordId};
use crate::record::{FlavourKind, RecordType};
use crate::role::RoleSet;
use crate::temporal::Timestamp;

// ─── IssuedTo ────────────────────────────────────────────────────────

/// Who a compliance record was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuedToType {
    Company,
    Individual,
    /// An individual operating under a business name.
    IndividualCombined,
}

/// The party a record was issued to.
///
/// `read` / `write` default to empty when decoded from input; builders
/// assign them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssuedTo {
    pub read: RoleSet,
    pub write: RoleSet,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub issued_to_type: Option<IssuedToType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(
        deserialize_with = "deserialize_loose_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<NaiveDate>,
}

impl IssuedTo {
    /// A company issuance.
    pub fn company(name: impl Into<String>) -> Self {
        Self {
            issued_to_type: Some(IssuedToType::Company),
            company_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// An individual issuance with first and last name.
    pub fn individual(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            issued_to_type: Some(IssuedToType::Individual),
            first_name: Some(first.into()),
            last_name: Some(last.into()),
            ..Self::default()
        }
    }
}

/// Accept either a bare date (`1980-04-01`) or a full RFC 3339 timestamp,
/// which is what the admin UI date picker submits.
fn deserialize_loose_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return Ok(Some(date));
    }
    Timestamp::parse_lenient(raw.trim())
        .map(|ts| Some(ts.as_datetime().date_naive()))
        .map_err(serde::de::Error::custom)
}

// ─── Business fields ─────────────────────────────────────────────────

/// Business fields shared by master and flavour documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordFields {
    #[serde(rename = "_epicProjectId", skip_serializing_if = "Option::is_none")]
    pub epic_project_id: Option<ObjectRef>,
    #[serde(rename = "_sourceRefId", skip_serializing_if = "Option::is_none")]
    pub source_ref_id: Option<ObjectRef>,
    #[serde(rename = "_epicMilestoneId", skip_serializing_if = "Option::is_none")]
    pub epic_milestone_id: Option<ObjectRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_issued: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_agency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legislation: Option<LegislationCitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legislation_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_to: Option<IssuedTo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// `[longitude, latitude]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid: Option<[f64; 2]>,
    pub documents: Vec<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome_description: Option<String>,
}

// ─── Documents ───────────────────────────────────────────────────────

/// Accessors shared by master and flavour documents, used by visibility
/// policy and persistence.
pub trait RecordDocument {
    fn id(&self) -> RecordId;
    fn schema_name(&self) -> &str;
    fn read(&self) -> &RoleSet;
    fn read_mut(&mut self) -> &mut RoleSet;
    fn write(&self) -> &RoleSet;
    fn issued_to(&self) -> Option<&IssuedTo>;
    fn issued_to_mut(&mut self) -> Option<&mut IssuedTo>;
}

/// The canonical cross-site representation of one compliance event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "_schemaName")]
    pub schema_name: String,
    pub record_type: RecordType,
    #[serde(flatten)]
    pub fields: RecordFields,
    pub read: RoleSet,
    pub write: RoleSet,
    /// Forward references to the flavours written with this master.
    pub flavour_records: Vec<RecordId>,
    pub added_by: String,
    pub date_added: Timestamp,
}

/// A site-specific published rendering of a master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavourRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "_schemaName")]
    pub schema_name: String,
    /// Back-reference to the owning master.
    #[serde(rename = "_master", skip_serializing_if = "Option::is_none")]
    pub master: Option<RecordId>,
    pub record_type: RecordType,
    pub flavour: FlavourKind,
    #[serde(flatten)]
    pub fields: RecordFields,
    /// Public description (LNG, BCMI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public summary (NRCED).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub read: RoleSet,
    pub write: RoleSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_by: Option<String>,
    pub added_by: String,
    pub date_added: Timestamp,
}

impl FlavourRecord {
    /// Whether `public` may read this flavour.
    pub fn is_published(&self) -> bool {
        self.read.contains(crate::role::Role::Public)
    }
}

macro_rules! impl_record_document {
    ($ty:ty) => {
        impl RecordDocument for $ty {
            fn id(&self) -> RecordId {
                self.id
            }

            fn schema_name(&self) -> &str {
                &self.schema_name
            }

            fn read(&self) -> &RoleSet {
                &self.read
            }

            fn read_mut(&mut self) -> &mut RoleSet {
                &mut self.read
            }

            fn write(&self) -> &RoleSet {
                &self.write
            }

            fn issued_to(&self) -> Option<&IssuedTo> {
                self.fields.issued_to.as_ref()
            }

            fn issued_to_mut(&mut self) -> Option<&mut IssuedTo> {
                self.fields.issued_to.as_mut()
            }
        }
    };
}

impl_record_document!(MasterRecord);
impl_record_document!(FlavourRecord);
