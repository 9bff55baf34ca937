//! # Legislation Citation
//!
//! A citation names the act a record was issued under, optionally narrowed
//! by regulation, section, subsection and paragraph. It is an immutable value
//! carried in a record's business fields and used as a lookup key for the
//! legislation reference table.

use serde::{Deserialize, Serialize};

/// A reference to a provision of legislation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislationCitation {
    pub act: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<String>,
}

impl LegislationCitation {
    /// A citation of a whole act.
    pub fn new(act: impl Into<String>) -> Self {
        Self {
            act: act.into(),
            regulation: None,
            section: None,
            sub_section: None,
            paragraph: None,
        }
    }

    pub fn with_regulation(mut self, regulation: impl Into<String>) -> Self {
        self.regulation = Some(regulation.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_sub_section(mut self, sub_section: impl Into<String>) -> Self {
        self.sub_section = Some(sub_section.into());
        self
    }

    pub fn with_paragraph(mut self, paragraph: impl Into<String>) -> Self {
        self.paragraph = Some(paragraph.into());
        self
    }

    /// The optional provision parts below the act, in descending order,
    /// skipping absent and blank ones.
    pub fn provisions(&self) -> impl Iterator<Item = &str> {
        [
            self.regulation.as_deref(),
            self.section.as_deref(),
            self.sub_section.as_deref(),
            self.paragraph.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for LegislationCitation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.act)?;
        if let Some(reg) = &self.regulation {
            write!(f, ", {reg}")?;
        }
        if let Some(section) = &self.section {
            write!(f, " s.{section}")?;
        }
        if let Some(sub) = &self.sub_section {
            write!(f, "({sub})")?;
        }
        if let Some(para) = &self.paragraph {
            write!(f, "({para})")?;
        }
        Ok(())
    }
}
