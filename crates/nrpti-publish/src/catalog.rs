//! # Standard Builders
//!
//! One generic master builder and one generic flavour builder, parameterised
//! by record type and flavour, replace a hand-written pair per record type.
//! [`BuilderCatalog`] hands out the right set for a record type.
//!
//! Both builders:
//!
//! - authorize the actor against the owning subsystem's writer roles,
//! - decode the shared business fields,
//! - fill `legislationDescription` from the reference table when a citation
//!   is given without one,
//! - stamp baseline `read` / `write` roles on the document and its
//!   `issuedTo`.
//!
//! The flavour builder additionally takes the site text (`description` for
//! LNG and BCMI, `summary` for NRCED) and applies public release when its
//! input carries `addRole: "public"`.

use std::sync::Arc;

use nrpti_core::{
    Actor, FlavourKind, FlavourRecord, MasterRecord, RecordFields, RecordId, RecordType,
    Timestamp,
};
use nrpti_legislation::{ActCodeMap, ActIndex, LegislationResolver};
use nrpti_policy::VisibilityPolicy;

use crate::builder::{FlavourBuilder, FlavourBuilders, MasterBuilder};
use crate::error::ValidationError;
use crate::input::RecordInput;

/// Shared lookup state for the standard builders.
#[derive(Clone)]
struct Lookup {
    resolver: LegislationResolver,
    acts: Arc<dyn ActIndex>,
}

impl Lookup {
    fn decode_fields(
        &self,
        record_type: RecordType,
        input: &RecordInput,
        target: &str,
    ) -> Result<RecordFields, ValidationError> {
        let mut fields: RecordFields = input.decode(target)?;
        let described = fields
            .legislation_description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty());
        if !described {
            if let Some(citation) = &fields.legislation {
                fields.legislation_description =
                    self.resolver
                        .describe_with(record_type, citation, self.acts.as_ref());
            }
        }
        Ok(fields)
    }
}

fn stamp_issued_to(fields: &mut RecordFields, policy: &VisibilityPolicy) {
    if let Some(issued) = fields.issued_to.as_mut() {
        issued.read = policy.issued_to_roles();
        issued.write = policy.issued_to_roles();
    }
}

/// The standard master builder for one record type.
#[derive(Clone)]
pub struct StandardMaster {
    record_type: RecordType,
    lookup: Lookup,
}

impl StandardMaster {
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }
}

impl MasterBuilder for StandardMaster {
    fn build(
        &self,
        actor: &Actor,
        input: &RecordInput,
        flavour_ids: &[RecordId],
    ) -> Result<MasterRecord, ValidationError> {
        let policy = VisibilityPolicy::master();
        policy.authorize(actor)?;

        let mut fields = self
            .lookup
            .decode_fields(self.record_type, input, self.record_type.as_str())?;
        stamp_issued_to(&mut fields, &policy);

        Ok(MasterRecord {
            id: RecordId::new(),
            schema_name: self.record_type.as_str().to_string(),
            record_type: self.record_type,
            fields,
            read: policy.base_roles(),
            write: policy.writer_roles(),
            flavour_records: flavour_ids.to_vec(),
            added_by: actor.display_name().to_string(),
            date_added: Timestamp::now(),
        })
    }
}

/// The standard flavour builder for one record type and site.
#[derive(Clone)]
pub struct StandardFlavour {
    record_type: RecordType,
    flavour: FlavourKind,
    lookup: Lookup,
}

impl std::fmt::Debug for StandardFlavour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardFlavour")
            .field("record_type", &self.record_type)
            .field("flavour", &self.flavour)
            .finish_non_exhaustive()
    }
}

impl StandardFlavour {
    pub fn schema_name(&self) -> String {
        self.flavour.schema_name(self.record_type)
    }
}

impl FlavourBuilder for StandardFlavour {
    fn build(&self, actor: &Actor, input: &RecordInput) -> Result<FlavourRecord, ValidationError> {
        let policy = VisibilityPolicy::for_flavour(self.flavour);
        policy.authorize(actor)?;

        let schema_name = self.schema_name();
        let mut fields = self
            .lookup
            .decode_fields(self.record_type, input, &schema_name)?;
        stamp_issued_to(&mut fields, &policy);

        let (description, summary) = match self.flavour {
            FlavourKind::Nrced => (None, input.text("summary")),
            FlavourKind::Lng | FlavourKind::Bcmi => (input.text("description"), None),
        };

        let mut doc = FlavourRecord {
            id: RecordId::new(),
            schema_name,
            master: None,
            record_type: self.record_type,
            flavour: self.flavour,
            fields,
            description,
            summary,
            read: policy.base_roles(),
            write: policy.writer_roles(),
            date_published: None,
            published_by: None,
            added_by: actor.display_name().to_string(),
            date_added: Timestamp::now(),
        };
        policy.apply_public_release(&mut doc, actor, input.release_requested());
        tracing::debug!(
            record_id = %doc.id,
            schema = %doc.schema_name,
            published = doc.is_published(),
            "built flavour"
        );
        Ok(doc)
    }
}

/// Hands out the standard builders for each record type.
#[derive(Clone)]
pub struct BuilderCatalog {
    lookup: Lookup,
}

impl BuilderCatalog {
    /// Builders resolving act codes with [`ActCodeMap::standard`].
    pub fn new(resolver: LegislationResolver) -> Self {
        Self::with_act_index(resolver, Arc::new(ActCodeMap::standard()))
    }

    pub fn with_act_index(resolver: LegislationResolver, acts: Arc<dyn ActIndex>) -> Self {
        Self {
            lookup: Lookup { resolver, acts },
        }
    }

    pub fn resolver(&self) -> &LegislationResolver {
        &self.lookup.resolver
    }

    pub fn master_builder(&self, record_type: RecordType) -> StandardMaster {
        StandardMaster {
            record_type,
            lookup: self.lookup.clone(),
        }
    }

    /// # Errors
    ///
    /// `ValidationError::UnsupportedFlavour` if the record type is never
    /// published to that site.
    pub fn flavour_builder(
        &self,
        record_type: RecordType,
        flavour: FlavourKind,
    ) -> Result<StandardFlavour, ValidationError> {
        if !record_type.supports(flavour) {
            return Err(ValidationError::UnsupportedFlavour {
                record_type,
                flavour,
            });
        }
        Ok(StandardFlavour {
            record_type,
            flavour,
            lookup: self.lookup.clone(),
        })
    }

    /// Every flavour builder for `record_type`, keyed by schema name.
    pub fn flavour_builders(&self, record_type: RecordType) -> FlavourBuilders {
        record_type
            .flavours()
            .iter()
            .map(|flavour| {
                let builder = StandardFlavour {
                    record_type,
                    flavour: *flavour,
                    lookup: self.lookup.clone(),
                };
                (
                    builder.schema_name(),
                    Box::new(builder) as Box<dyn FlavourBuilder>,
                )
            })
            .collect()
    }
}

impl std::fmt::Debug for BuilderCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderCatalog")
            .field("resolver", &self.lookup.resolver)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrpti_core::Role;
    use nrpti_legislation::ReferenceTable;
    use serde_json::json;

    fn catalog() -> BuilderCatalog {
        let table = ReferenceTable::from_yaml_str(
            "Order:\n  Water Act:\n    \"47\":\n      description: Water Sustainability Act Order\n",
            "inline",
        )
        .unwrap();
        BuilderCatalog::new(LegislationResolver::new(table))
    }

    fn lng_admin() -> Actor {
        Actor::from_role_strings("Lee Admin", ["admin:lng"])
    }

    fn input(value: serde_json::Value) -> RecordInput {
        RecordInput::from_value(value).unwrap()
    }

    #[test]
    fn builders_follow_record_type_table() {
        let keys: Vec<String> = catalog()
            .flavour_builders(RecordType::Order)
            .into_keys()
            .collect();
        assert_eq!(keys, vec!["OrderLNG".to_string(), "OrderNRCED".to_string()]);
        assert!(catalog()
            .flavour_builders(RecordType::AnnualReport)
            .contains_key("AnnualReportBCMI"));
    }

    #[test]
    fn unsupported_flavour_rejected() {
        let err = catalog()
            .flavour_builder(RecordType::Ticket, FlavourKind::Bcmi)
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedFlavour { .. }));
    }

    #[test]
    fn master_fills_legislation_description() {
        let master = catalog()
            .master_builder(RecordType::Order)
            .build(
                &lng_admin(),
                &input(json!({
                    "recordName": "Water order",
                    "legislation": {"act": "Water Act", "section": "47"}
                })),
                &[],
            )
            .unwrap();
        assert_eq!(
            master.fields.legislation_description.as_deref(),
            Some("Water Sustainability Act Order")
        );
        assert_eq!(master.schema_name, "Order");
        assert_eq!(master.added_by, "Lee Admin");
        assert!(master.write.is_subset_of(&master.read));
    }

    #[test]
    fn given_description_is_kept() {
        let master = catalog()
            .master_builder(RecordType::Order)
            .build(
                &lng_admin(),
                &input(json!({
                    "legislation": {"act": "Water Act", "section": "47"},
                    "legislationDescription": "As entered"
                })),
                &[],
            )
            .unwrap();
        assert_eq!(
            master.fields.legislation_description.as_deref(),
            Some("As entered")
        );
    }

    #[test]
    fn master_records_flavour_ids() {
        let ids = [RecordId::new(), RecordId::new()];
        let master = catalog()
            .master_builder(RecordType::Order)
            .build(&lng_admin(), &input(json!({})), &ids)
            .unwrap();
        assert_eq!(master.flavour_records, ids.to_vec());
    }

    #[test]
    fn flavour_requires_site_role() {
        let builder = catalog()
            .flavour_builder(RecordType::Order, FlavourKind::Lng)
            .unwrap();
        let nrced_admin = Actor::from_role_strings("Kim", ["admin:nrced"]);
        let err = builder.build(&nrced_admin, &input(json!({}))).unwrap_err();
        assert!(matches!(err, ValidationError::Unauthorized(_)));
    }

    #[test]
    fn nrced_flavour_takes_summary() {
        let builder = catalog()
            .flavour_builder(RecordType::Order, FlavourKind::Nrced)
            .unwrap();
        let doc = builder
            .build(
                &Actor::from_role_strings("Kim", ["admin:env-cos"]),
                &input(json!({"summary": " Stop work ", "description": "ignored"})),
            )
            .unwrap();
        assert_eq!(doc.summary.as_deref(), Some("Stop work"));
        assert_eq!(doc.description, None);
        assert_eq!(doc.schema_name, "OrderNRCED");
        assert!(!doc.is_published());
    }

    #[test]
    fn flavour_release_and_issued_to_roles() {
        let builder = catalog()
            .flavour_builder(RecordType::Order, FlavourKind::Lng)
            .unwrap();
        let doc = builder
            .build(
                &lng_admin(),
                &input(json!({
                    "description": "LNG text",
                    "addRole": "public",
                    "issuedTo": {"type": "Company", "companyName": "Acme"}
                })),
            )
            .unwrap();
        assert!(doc.read.contains(Role::Public));
        assert!(doc.date_published.is_some());
        assert_eq!(doc.published_by.as_deref(), Some("Lee Admin"));
        let issued = doc.fields.issued_to.unwrap();
        assert!(!issued.read.contains(Role::Public));
        assert!(issued.read.contains(Role::AdminLng));
    }

    #[test]
    fn undecodable_fields_rejected() {
        let builder = catalog()
            .flavour_builder(RecordType::Order, FlavourKind::Lng)
            .unwrap();
        let err = builder
            .build(&lng_admin(), &input(json!({"dateIssued": "yesterday"})))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Decode { target, .. } if target == "OrderLNG"));
    }

    #[test]
    fn act_codes_resolve_in_builders() {
        let table = ReferenceTable::from_yaml_str(
            "Inspection:\n  Mines Act:\n    \"15\":\n      description: Inspection of a mine\n",
            "inline",
        )
        .unwrap();
        let catalog = BuilderCatalog::new(LegislationResolver::new(table));
        let master = catalog
            .master_builder(RecordType::Inspection)
            .build(
                &Actor::from_role_strings("Root", ["sysadmin"]),
                &input(json!({"legislation": {"act": "MA", "section": "15"}})),
                &[],
            )
            .unwrap();
        assert_eq!(
            master.fields.legislation_description.as_deref(),
            Some("Inspection of a mine")
        );
    }
}
