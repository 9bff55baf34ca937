//! # Legislation Resolver
//!
//! Resolves a citation to the canonical description for a record type by
//! walking the reference table along
//! `record type → act → regulation → section → subsection → paragraph →
//! "description"`, skipping provision parts the citation leaves out.

use std::path::Path;
use std::sync::Arc;

use nrpti_core::{LegislationCitation, RecordType};

use crate::acts::{ActIndex, VerbatimActs};
use crate::error::LegislationError;
use crate::table::ReferenceTable;

const DESCRIPTION_KEY: &str = "description";

/// Citation-to-description lookup over a shared reference table.
///
/// Cloning is cheap; clones share the table.
#[derive(Debug, Clone)]
pub struct LegislationResolver {
    table: Arc<ReferenceTable>,
}

impl LegislationResolver {
    pub fn new(table: ReferenceTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// A resolver over the bundled table.
    pub fn bundled() -> Result<Self, LegislationError> {
        ReferenceTable::bundled().map(Self::new)
    }

    /// A resolver over the override file when given, else the bundled table.
    pub fn load(override_path: Option<&Path>) -> Result<Self, LegislationError> {
        ReferenceTable::load(override_path).map(Self::new)
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Describe `citation` with its act used as written.
    pub fn describe(&self, record_type: RecordType, citation: &LegislationCitation) -> Option<String> {
        self.describe_with(record_type, citation, &VerbatimActs)
    }

    /// Describe `citation`, normalising its act through `acts`.
    pub fn describe_with(
        &self,
        record_type: RecordType,
        citation: &LegislationCitation,
        acts: &dyn ActIndex,
    ) -> Option<String> {
        let act = acts.table_key(&citation.act)?;
        let path = [record_type.as_str(), act.as_str()]
            .into_iter()
            .chain(citation.provisions())
            .chain(std::iter::once(DESCRIPTION_KEY));
        let found = self
            .table
            .lookup(path)
            .and_then(|node| node.as_text())
            .map(str::to_string);
        if found.is_none() {
            tracing::debug!(
                record_type = %record_type,
                citation = %citation,
                "no legislation description"
            );
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acts::ActCodeMap;

    fn water_table() -> LegislationResolver {
        let table = ReferenceTable::from_yaml_str(
            r#"
Order:
  Water Act:
    "47":
      description: Water Sustainability Act Order
"#,
            "inline",
        )
        .unwrap();
        LegislationResolver::new(table)
    }

    #[test]
    fn resolves_section_description() {
        let citation = LegislationCitation::new("Water Act").with_section("47");
        assert_eq!(
            water_table().describe(RecordType::Order, &citation).as_deref(),
            Some("Water Sustainability Act Order")
        );
    }

    #[test]
    fn unknown_act_is_none() {
        let citation = LegislationCitation::new("Unknown Act");
        assert_eq!(water_table().describe(RecordType::Order, &citation), None);
    }

    #[test]
    fn other_record_type_is_none() {
        let citation = LegislationCitation::new("Water Act").with_section("47");
        assert_eq!(water_table().describe(RecordType::Ticket, &citation), None);
    }

    #[test]
    fn path_stopping_at_branch_without_description_is_none() {
        let citation = LegislationCitation::new("Water Act");
        assert_eq!(water_table().describe(RecordType::Order, &citation), None);
    }

    #[test]
    fn deeper_path_than_table_is_none() {
        let citation = LegislationCitation::new("Water Act")
            .with_section("47")
            .with_sub_section("2");
        assert_eq!(water_table().describe(RecordType::Order, &citation), None);
    }

    #[test]
    fn blank_provisions_are_skipped() {
        let citation = LegislationCitation::new("Water Act")
            .with_regulation("  ")
            .with_section("47");
        assert!(water_table().describe(RecordType::Order, &citation).is_some());
    }

    #[test]
    fn act_codes_resolve_through_index() {
        let resolver = LegislationResolver::bundled().unwrap();
        let citation = LegislationCitation::new("EMA")
            .with_section("83")
            .with_sub_section("1");
        assert_eq!(resolver.describe(RecordType::Order, &citation), None);
        assert_eq!(
            resolver
                .describe_with(RecordType::Order, &citation, &ActCodeMap::standard())
                .as_deref(),
            Some("Order respecting the discharge of waste")
        );
    }

    #[test]
    fn bundled_regulation_path() {
        let resolver = LegislationResolver::bundled().unwrap();
        let citation = LegislationCitation::new("Wildfire Act")
            .with_regulation("Wildfire Regulation")
            .with_section("9");
        assert_eq!(
            resolver.describe(RecordType::Ticket, &citation).as_deref(),
            Some("Lighting an open fire in contravention of the regulation")
        );
    }
}
