//! # Temporal Types: UTC-Only Timestamps
//!
//! `Timestamp` stamps `dateAdded` and `datePublished`, and carries business
//! dates such as `dateIssued`. Values are UTC and truncated to seconds, and
//! serialize as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! Strict parsing ([`Timestamp::parse`]) rejects explicit offsets. Record
//! input from the admin UI arrives with arbitrary offsets, so deserialization
//! goes through the lenient path and converts to UTC.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NrptiError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string with the `Z` suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid RFC 3339 or uses an
    /// explicit offset (even `+00:00`).
    pub fn parse(s: &str) -> Result<Self, NrptiError> {
        if !s.ends_with('Z') {
            return Err(NrptiError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        Self::parse_lenient(s)
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, NrptiError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| NrptiError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_lenient(&raw).map_err(serde::de::Error::custom)
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
