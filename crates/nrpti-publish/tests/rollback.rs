//! Failure paths: nothing half-written survives an operation.

mod common;

use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;

use nrpti_core::{FlavourKind, RecordType};
use nrpti_publish::{PublishError, RecordInput, Rollback, ValidationError};

use common::{lng_admin, nrced_admin, orchestrator, sysadmin, FaultyStore};

fn input(value: serde_json::Value) -> RecordInput {
    RecordInput::from_value(value).unwrap()
}

fn order_for_both_sites() -> RecordInput {
    input(json!({
        "recordName": "Order to cease discharge",
        "issuedTo": {"type": "Company", "companyName": "Acme Pipelines Ltd."},
        "OrderLNG": {"description": "LNG text", "addRole": "public"},
        "OrderNRCED": {"summary": "NRCED text"}
    }))
}

#[tokio::test]
async fn rejected_flavour_writes_nothing() {
    let store = FaultyStore::new();
    // An LNG admin may not build the NRCED flavour.
    let err = orchestrator(&store)
        .create_record(&lng_admin(), RecordType::Order, &order_for_both_sites())
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(
        err,
        PublishError::Validation(ValidationError::Unauthorized(_))
    ));
    assert!(store.inner.is_empty());
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn rejected_master_writes_nothing() {
    let store = FaultyStore::new();
    let nobody = nrpti_core::Actor::from_role_strings("Guest", Vec::<String>::new());
    let err = orchestrator(&store)
        .create_record(&nobody, RecordType::Permit, &input(json!({})))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(store.inner.is_empty());
}

#[tokio::test]
async fn unsupported_site_key_rejected() {
    let store = FaultyStore::new();
    let err = orchestrator(&store)
        .create_record(
            &sysadmin(),
            RecordType::Ticket,
            &input(json!({"TicketBCMI": {"description": "no such site"}})),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PublishError::Validation(ValidationError::UnsupportedFlavour {
            record_type: RecordType::Ticket,
            flavour: FlavourKind::Bcmi,
        })
    ));
    assert!(store.inner.is_empty());
}

#[tokio::test]
async fn failed_flavour_write_rolls_back_everything() {
    let store = FaultyStore::new().fail_saves_of("OrderNRCED");
    let err = orchestrator(&store)
        .create_record(&sysadmin(), RecordType::Order, &order_for_both_sites())
        .await
        .unwrap_err();

    let rollback = err.rollback().expect("persistence failure carries a rollback");
    assert!(rollback.is_clean());
    assert!(matches!(rollback, Rollback::Clean { deleted: 2 }));
    assert!(store.inner.is_empty());
    assert_eq!(store.delete_calls(), 1);
}

#[tokio::test]
async fn failed_master_write_rolls_back_flavours() {
    let store = FaultyStore::new().fail_saves_of("Inspection");
    let err = orchestrator(&store)
        .create_record(
            &sysadmin(),
            RecordType::Inspection,
            &input(json!({"InspectionNRCED": {}, "InspectionLNG": {}})),
        )
        .await
        .unwrap_err();
    assert!(err.rollback().is_some_and(Rollback::is_clean));
    assert!(store.inner.is_empty());
}

#[tokio::test]
async fn failed_rollback_reports_orphans() {
    let store = FaultyStore::new()
        .fail_saves_of("OrderLNG")
        .fail_deletes(10);
    let err = orchestrator(&store)
        .with_compensation_retries(2)
        .create_record(&sysadmin(), RecordType::Order, &order_for_both_sites())
        .await
        .unwrap_err();

    let Some(Rollback::Orphaned(compensation)) = err.rollback() else {
        panic!("expected orphaned rollback, got {err:?}");
    };
    // Master and NRCED flavour were written; the LNG flavour never was.
    assert_eq!(compensation.orphans.len(), 2);
    for id in &compensation.orphans {
        assert!(store.inner.contains(*id));
    }
    assert_eq!(store.inner.len(), 2);
    assert_eq!(store.delete_calls(), 3);
}

#[tokio::test]
async fn transient_delete_failure_is_retried() {
    let store = FaultyStore::new()
        .fail_saves_of("OrderNRCED")
        .fail_deletes(1);
    let err = orchestrator(&store)
        .with_compensation_retries(1)
        .create_record(&sysadmin(), RecordType::Order, &order_for_both_sites())
        .await
        .unwrap_err();
    assert!(err.rollback().is_some_and(Rollback::is_clean));
    assert!(store.inner.is_empty());
    assert_eq!(store.delete_calls(), 2);
}

#[tokio::test]
async fn zero_retries_gives_up_after_one_delete() {
    let store = FaultyStore::new()
        .fail_saves_of("OrderNRCED")
        .fail_deletes(1);
    let err = orchestrator(&store)
        .with_compensation_retries(0)
        .create_record(&sysadmin(), RecordType::Order, &order_for_both_sites())
        .await
        .unwrap_err();
    assert!(matches!(err.rollback(), Some(Rollback::Orphaned(_))));
    assert_eq!(store.delete_calls(), 1);
}

#[tokio::test]
async fn dropped_caller_still_rolls_back() {
    let store = FaultyStore::new()
        .fail_saves_of("OrderNRCED")
        .slow_saves_of("OrderNRCED", Duration::from_millis(100));
    let orchestrator = orchestrator(&store);

    let timed_out = tokio::time::timeout(
        Duration::from_millis(10),
        orchestrator.create_record(&sysadmin(), RecordType::Order, &order_for_both_sites()),
    )
    .await;
    assert!(timed_out.is_err());

    // The detached persistence task finishes the write set and compensates.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(store.inner.is_empty());
    assert_eq!(store.delete_calls(), 1);
}

fn inspection_for_both_sites() -> RecordInput {
    input(json!({
        "recordName": "Pipeline right-of-way inspection",
        "InspectionLNG": {"description": "LNG text"},
        "InspectionNRCED": {"summary": "NRCED text"}
    }))
}

#[tokio::test]
async fn single_write_slot_serialises_the_record_set() {
    let store = FaultyStore::new().with_save_delay(Duration::from_millis(20));
    let publication = orchestrator(&store)
        .with_max_concurrent_writes(1)
        .create_record(&sysadmin(), RecordType::Inspection, &inspection_for_both_sites())
        .await
        .unwrap();
    assert_eq!(publication.flavours.len(), 2);
    assert_eq!(store.inner.len(), 3);
    assert_eq!(store.max_in_flight(), 1);
}

#[tokio::test]
async fn writes_overlap_up_to_the_limit() {
    let store = FaultyStore::new().with_save_delay(Duration::from_millis(20));
    orchestrator(&store)
        .with_max_concurrent_writes(2)
        .create_record(&sysadmin(), RecordType::Inspection, &inspection_for_both_sites())
        .await
        .unwrap();
    assert_eq!(store.inner.len(), 3);
    assert_eq!(store.max_in_flight(), 2);
}

#[tokio::test]
async fn bounded_writes_still_roll_back() {
    let store = FaultyStore::new()
        .with_save_delay(Duration::from_millis(5))
        .fail_saves_of("InspectionLNG");
    let err = orchestrator(&store)
        .with_max_concurrent_writes(1)
        .create_record(&sysadmin(), RecordType::Inspection, &inspection_for_both_sites())
        .await
        .unwrap_err();
    assert!(err.rollback().is_some_and(Rollback::is_clean));
    assert!(store.inner.is_empty());
    assert_eq!(store.max_in_flight(), 1);
}

#[tokio::test]
async fn nrced_admin_publishes_nrced_only_record() {
    let store = FaultyStore::new();
    let publication = orchestrator(&store)
        .create_record(
            &nrced_admin(),
            RecordType::Ticket,
            &input(json!({"TicketNRCED": {"summary": "Ticket issued", "addRole": "public"}})),
        )
        .await
        .unwrap();
    assert!(publication.flavours[0].is_published());
    assert_eq!(store.inner.len(), 2);
}

fn arbitrary_actor() -> impl Strategy<Value = nrpti_core::Actor> {
    prop::sample::subsequence(
        vec!["sysadmin", "admin:lng", "admin:nrced", "admin:bcmi", "admin:env-cos"],
        0..=2,
    )
    .prop_map(|roles| nrpti_core::Actor::from_role_strings("Generated", roles))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn rejection_never_persists(
        actor in arbitrary_actor(),
        lng in any::<bool>(),
        nrced in any::<bool>(),
        public in any::<bool>(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let store = FaultyStore::new();
        let mut fields = serde_json::Map::new();
        fields.insert("recordName".into(), json!("Generated order"));
        let site = if public { json!({"addRole": "public"}) } else { json!({}) };
        if lng {
            fields.insert("OrderLNG".into(), site.clone());
        }
        if nrced {
            fields.insert("OrderNRCED".into(), site);
        }
        let requested = usize::from(lng) + usize::from(nrced);

        let outcome = runtime.block_on(
            orchestrator(&store).create_record(&actor, RecordType::Order, &RecordInput::new(fields)),
        );
        match outcome {
            Ok(publication) => {
                prop_assert_eq!(publication.flavours.len(), requested);
                prop_assert_eq!(store.inner.len(), requested + 1);
            }
            Err(err) => {
                prop_assert!(err.is_validation());
                prop_assert!(store.inner.is_empty());
            }
        }
    }
}
