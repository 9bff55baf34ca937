use thiserror::Error;

/// Errors loading a legislation reference table.
///
/// Lookups never fail: a citation the table does not know resolves to
/// `None`.
#[derive(Error, Debug)]
pub enum LegislationError {
    /// The table text is not valid YAML.
    #[error("cannot parse legislation table from {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    /// The YAML is valid but does not have the shape of a reference tree.
    #[error("malformed legislation table {source_name} at '{path}': {reason}")]
    Malformed {
        source_name: String,
        /// Dotted key path to the offending node.
        path: String,
        reason: String,
    },

    #[error("cannot read legislation table {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
