//! # Act Index
//!
//! Maps the act segment of a citation onto the key used in the reference
//! table. Callers that hold act codes (`EMA`, `WSA`) pass an [`ActCodeMap`];
//! callers that already hold act titles use [`VerbatimActs`].

use std::collections::HashMap;

/// Normalises a cited act into a reference table key.
pub trait ActIndex: Send + Sync {
    /// The table key for `act`, or `None` when this index cannot place it.
    fn table_key(&self, act: &str) -> Option<String>;
}

/// Uses the act as written, trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimActs;

impl ActIndex for VerbatimActs {
    fn table_key(&self, act: &str) -> Option<String> {
        let act = act.trim();
        (!act.is_empty()).then(|| act.to_string())
    }
}

/// Act codes used by the agency source systems.
const STANDARD_CODES: &[(&str, &str)] = &[
    ("EMA", "Environmental Management Act"),
    ("EAA", "Environmental Assessment Act"),
    ("WSA", "Water Sustainability Act"),
    ("WA", "Wildlife Act"),
    ("WFA", "Wildfire Act"),
    ("FA", "Fisheries Act"),
    ("FRPA", "Forest and Range Practices Act"),
    ("MA", "Mines Act"),
    ("OGAA", "Oil and Gas Activities Act"),
];

/// Resolves act codes to titles, case-insensitively.
///
/// Anything that is not a known code passes through unchanged, so a
/// citation that already names the act by title still resolves.
#[derive(Debug, Clone, Default)]
pub struct ActCodeMap {
    codes: HashMap<String, String>,
}

impl ActCodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The codes used by the agency source systems.
    pub fn standard() -> Self {
        Self::from_pairs(STANDARD_CODES.iter().copied())
    }

    pub fn from_pairs<I, C, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: AsRef<str>,
        T: Into<String>,
    {
        let mut map = Self::new();
        for (code, title) in pairs {
            map.insert(code, title);
        }
        map
    }

    pub fn insert(&mut self, code: impl AsRef<str>, title: impl Into<String>) {
        self.codes
            .insert(code.as_ref().trim().to_ascii_uppercase(), title.into());
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl ActIndex for ActCodeMap {
    fn table_key(&self, act: &str) -> Option<String> {
        let trimmed = act.trim();
        match self.codes.get(&trimmed.to_ascii_uppercase()) {
            Some(title) => Some(title.clone()),
            None => VerbatimActs.table_key(trimmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbatim_trims_and_rejects_blank() {
        assert_eq!(
            VerbatimActs.table_key("  Mines Act "),
            Some("Mines Act".to_string())
        );
        assert_eq!(VerbatimActs.table_key("   "), None);
    }

    #[test]
    fn codes_resolve_case_insensitively() {
        let acts = ActCodeMap::standard();
        assert_eq!(
            acts.table_key("ema"),
            Some("Environmental Management Act".to_string())
        );
        assert_eq!(acts.table_key("Wildlife Act"), Some("Wildlife Act".to_string()));
    }

    #[test]
    fn custom_codes_override() {
        let mut acts = ActCodeMap::standard();
        acts.insert("wa", "Water Act");
        assert_eq!(acts.table_key("WA"), Some("Water Act".to_string()));
        assert_eq!(acts.len(), STANDARD_CODES.len());
    }
}
