//! # Identifier Newtypes
//!
//! `RecordId` identifies a master or flavour document allocated by this
//! subsystem. `ObjectRef` is an integration reference into an external
//! system (EPIC projects, milestones, source records), which are store-native
//! 24-hex-digit object ids.
//!
//! Keeping the two apart means an external project reference can never be
//! written into `flavourRecords` or `_master` by accident.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::NrptiError;

/// Unique identifier for a master or flavour record document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Allocate a new random record identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a record identifier from its hyphenated UUID form.
    pub fn parse(s: &str) -> Result<Self, NrptiError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| NrptiError::InvalidIdentifier(format!("record id {s:?}: {e}")))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length of a store-native object id in hex characters.
const OBJECT_REF_LEN: usize = 24;

/// Validated reference to a document in an external system.
///
/// Always 24 lowercase hex characters. Uppercase input is normalised.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectRef(String);

impl ObjectRef {
    /// Validate and wrap an external object id.
    pub fn parse(s: &str) -> Result<Self, NrptiError> {
        if s.len() != OBJECT_REF_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(NrptiError::InvalidIdentifier(format!(
                "object reference must be {OBJECT_REF_LEN} hex characters, got {s:?}"
            )));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// The normalised hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectRef {
    type Error = NrptiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectRef> for String {
    fn from(value: ObjectRef) -> Self {
        value.0
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
