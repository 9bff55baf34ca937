//! Store layout of flavour documents: the back-reference, schema name and
//! publication stamps must serialize under the field names the public sites
//! query on.

use nrpti_core::{
    FlavourKind, FlavourRecord, RecordFields, RecordId, RecordType, Role, RoleSet, Timestamp,
};

fn flavour(master: Option<RecordId>) -> FlavourRecord {
    FlavourRecord {
        id: RecordId::new(),
        schema_name: FlavourKind::Nrced.schema_name(RecordType::Ticket),
        master,
        record_type: RecordType::Ticket,
        flavour: FlavourKind::Nrced,
        fields: RecordFields::default(),
        description: None,
        summary: Some("Ticket issued for fishing without a licence".to_string()),
        read: RoleSet::from_roles(&[Role::SysAdmin, Role::AdminNrced, Role::Public]),
        write: RoleSet::from_roles(&[Role::SysAdmin, Role::AdminNrced]),
        date_published: Some(Timestamp::parse("2026-05-01T00:00:00Z").unwrap()),
        published_by: Some("Officer Kim".to_string()),
        added_by: "Officer Kim".to_string(),
        date_added: Timestamp::parse("2026-05-01T00:00:00Z").unwrap(),
    }
}

#[test]
fn back_reference_serializes_as_underscore_master() {
    let master_id = RecordId::new();
    let json = serde_json::to_value(flavour(Some(master_id))).unwrap();
    assert_eq!(json["_master"], serde_json::json!(master_id.to_string()));
    assert_eq!(json["_schemaName"], "TicketNRCED");
    assert_eq!(json["flavour"], "NRCED");
    assert_eq!(json["datePublished"], "2026-05-01T00:00:00Z");
    assert_eq!(json["publishedBy"], "Officer Kim");
    assert!(json.get("description").is_none());
}

#[test]
fn missing_back_reference_is_omitted() {
    let json = serde_json::to_value(flavour(None)).unwrap();
    assert!(json.get("_master").is_none());
}

#[test]
fn published_flag_follows_read_list() {
    let mut f = flavour(None);
    assert!(f.is_published());
    f.read.remove(Role::Public);
    assert!(!f.is_published());
}
