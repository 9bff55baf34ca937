//! # Record Input
//!
//! The admin UI submits one JSON object per record: shared business fields
//! at the top level, plus one sub-object per site to publish to, keyed by the
//! flavour schema name.
//!
//! ```json
//! {
//!   "recordName": "Order to cease discharge",
//!   "issuedTo": { "type": "Company", "companyName": "Acme Pipelines Ltd." },
//!   "OrderLNG":   { "description": "LNG site text", "addRole": "public" },
//!   "OrderNRCED": { "summary": "NRCED site text" }
//! }
//! ```
//!
//! A flavour builder sees a merged view: the top-level fields without any
//! flavour sub-object or top-level `addRole`, overlaid with its own
//! sub-object.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use nrpti_core::Role;

use crate::error::ValidationError;

/// Key requesting public release of a flavour.
pub const ADD_ROLE_KEY: &str = "addRole";

/// A JSON object of record input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordInput {
    fields: Map<String, Value>,
}

impl RecordInput {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ValidationError::decode(
                "record",
                format!("expected a JSON object, got {}", kind(&other)),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The view a flavour builder sees for `key`. Every key in
    /// `flavour_keys` is removed, then `input[key]` is overlaid.
    ///
    /// # Errors
    ///
    /// `ValidationError::Decode` if `input[key]` is present but not an object.
    pub fn merged_view<'a, I>(&self, key: &str, flavour_keys: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut merged = self.fields.clone();
        merged.remove(ADD_ROLE_KEY);
        for sibling in flavour_keys {
            merged.remove(sibling);
        }
        match self.fields.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::Object(overrides)) => {
                for (k, v) in overrides {
                    merged.insert(k.clone(), v.clone());
                }
            }
            Some(other) => {
                return Err(ValidationError::decode(
                    key,
                    format!("expected a JSON object, got {}", kind(other)),
                ))
            }
        }
        Ok(Self { fields: merged })
    }

    /// Decode the whole input as `T`. Unknown keys are ignored.
    pub fn decode<T: DeserializeOwned>(&self, target: &str) -> Result<T, ValidationError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| ValidationError::decode(target, e))
    }

    /// A trimmed, non-empty string field.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Whether `addRole` asks for `public`. Accepts a single role string or
    /// a list of them.
    pub fn release_requested(&self) -> bool {
        let public = Role::Public.as_str();
        match self.fields.get(ADD_ROLE_KEY) {
            Some(Value::String(role)) => role.trim() == public,
            Some(Value::Array(roles)) => roles
                .iter()
                .any(|r| r.as_str().is_some_and(|r| r.trim() == public)),
            _ => false,
        }
    }
}

impl From<Map<String, Value>> for RecordInput {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
