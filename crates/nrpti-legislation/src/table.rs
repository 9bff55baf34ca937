//! # Reference Table
//!
//! The static legislation reference tree: nested maps keyed by record type,
//! act, and provision segments, with string leaves. Only the leaf under a
//! `description` key is ever returned by the resolver, but the tree may hold
//! other text leaves (notes, codes) which act as dead ends during descent.
//!
//! The table is decoded from YAML. Integer keys (`47`) and booleans are
//! accepted and stored as their text form, so unquoted section numbers in a
//! hand-edited table still match citation segments. Decimal keys must be
//! quoted (`"7.10"`): YAML reads an unquoted `7.10` as the float `7.1`, and
//! the table rejects it rather than store the wrong section.

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::Value;

use crate::error::LegislationError;

/// The table shipped with the crate.
const BUNDLED_TABLE: &str = include_str!("../data/legislation.yaml");

/// One node of the reference tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableNode {
    Text(String),
    Branch(BTreeMap<String, TableNode>),
}

impl TableNode {
    /// The child under `key`, if this is a branch holding one.
    pub fn child(&self, key: &str) -> Option<&TableNode> {
        match self {
            Self::Branch(children) => children.get(key),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Branch(_) => None,
        }
    }
}

/// A decoded legislation reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTable {
    root: TableNode,
}

impl ReferenceTable {
    /// The table bundled with this crate.
    ///
    /// # Errors
    ///
    /// Returns `LegislationError::Parse` if the bundled YAML is malformed.
    pub fn bundled() -> Result<Self, LegislationError> {
        Self::from_yaml_str(BUNDLED_TABLE, "bundled table")
    }

    /// Decode a table from YAML text. `source` names the origin in errors.
    pub fn from_yaml_str(yaml: &str, source: &str) -> Result<Self, LegislationError> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| LegislationError::Parse {
            source_name: source.to_string(),
            reason: e.to_string(),
        })?;
        let root = convert(&value, &mut Vec::new()).map_err(|(path, reason)| {
            LegislationError::Malformed {
                source_name: source.to_string(),
                path,
                reason,
            }
        })?;
        if !matches!(root, TableNode::Branch(_)) {
            return Err(LegislationError::Malformed {
                source_name: source.to_string(),
                path: String::new(),
                reason: "top level must be a mapping keyed by record type".to_string(),
            });
        }
        Ok(Self { root })
    }

    /// Read and decode a YAML table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LegislationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LegislationError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// The override file when one is given, else the bundled table.
    pub fn load(override_path: Option<&Path>) -> Result<Self, LegislationError> {
        match override_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading legislation table override");
                Self::from_path(path)
            }
            None => Self::bundled(),
        }
    }

    pub fn root(&self) -> &TableNode {
        &self.root
    }

    /// Descend one segment at a time. `None` as soon as a segment is
    /// missing or the walk hits a text leaf before the path is exhausted.
    pub fn lookup<'a, I>(&self, path: I) -> Option<&TableNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Record type keys present at the top level.
    pub fn record_types(&self) -> impl Iterator<Item = &str> {
        let children = match &self.root {
            TableNode::Branch(children) => Some(children.keys().map(String::as_str)),
            TableNode::Text(_) => None,
        };
        children.into_iter().flatten()
    }
}

fn key_text(key: &Value) -> Result<String, String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Value::Number(n) => Err(format!(
            "unquoted decimal key {n}; quote decimal section keys (e.g. \"7.10\")"
        )),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported key {other:?}")),
    }
}

fn convert(value: &Value, path: &mut Vec<String>) -> Result<TableNode, (String, String)> {
    match value {
        Value::Mapping(map) => {
            let mut children = BTreeMap::new();
            for (key, child) in map {
                let key = key_text(key).map_err(|reason| (path.join("."), reason))?;
                path.push(key.clone());
                let node = convert(child, path)?;
                path.pop();
                children.insert(key, node);
            }
            Ok(TableNode::Branch(children))
        }
        Value::String(s) => Ok(TableNode::Text(s.clone())),
        Value::Number(n) => Ok(TableNode::Text(n.to_string())),
        Value::Bool(b) => Ok(TableNode::Text(b.to_string())),
        Value::Null => Ok(TableNode::Branch(BTreeMap::new())),
        Value::Sequence(_) => Err((path.join("."), "sequences are not allowed".to_string())),
        Value::Tagged(tagged) => convert(&tagged.value, path),
    }
}
