//! # nrpti-cli: Operator CLI for Record Publication
//!
//! Provides the `nrpti` command-line interface over the publication crates.
//!
//! ## Subcommands
//!
//! - `nrpti describe`: Resolve the description of a legislation citation.
//! - `nrpti search`: Render the search request for a project filter.
//! - `nrpti publish`: Publish a record set from a JSON input file.
//!
//! ```bash
//! nrpti describe Order "Water Act" --section 47
//! nrpti search --projects lngCanada,otherProjects --record-type Order
//! nrpti publish Order record.json --actor "Lee Admin" --role admin:lng
//! ```
//!
//! Configuration comes from the environment (see `PublishConfig::from_env`).

pub mod describe;
pub mod publish;
pub mod search;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_json_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        std::fs::write(&path, br#"{"recordName": "Order 1"}"#).unwrap();
        let value = read_json(&path).unwrap();
        assert_eq!(value["recordName"], "Order 1");
    }

    #[test]
    fn read_json_reports_path_on_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = read_json(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn read_json_missing_file() {
        let err = read_json(Path::new("/nonexistent/record.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
