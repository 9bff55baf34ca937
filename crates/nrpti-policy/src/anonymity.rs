//! Anonymous-safe test for the `issuedTo` sub-object.
//!
//! A record is anonymous-safe when its `issuedTo`, if present, does not carry
//! data that singles out a private individual. Company issuance is always
//! safe. An individual issuance is safe only when every identifying field is
//! absent or blank.

use nrpti_core::{IssuedTo, IssuedToType, RecordDocument, Role};

/// Whether `issued` carries data identifying a private individual.
pub fn identifies_individual(issued: &IssuedTo) -> bool {
    if issued.issued_to_type == Some(IssuedToType::Company) {
        return false;
    }
    let named = [
        &issued.first_name,
        &issued.middle_name,
        &issued.last_name,
        &issued.full_name,
    ]
    .into_iter()
    .any(|part| part.as_deref().is_some_and(|s| !s.trim().is_empty()));
    named || issued.date_of_birth.is_some()
}

/// Whether `doc`'s `issuedTo` may be shown to the public.
///
/// Documents without an `issuedTo` are safe.
pub fn is_anonymous_safe<D: RecordDocument + ?Sized>(doc: &D) -> bool {
    doc.issued_to().map_or(true, |issued| !identifies_individual(issued))
}

/// Grant `public` read on `doc.issuedTo` when the document is anonymous-safe.
///
/// Returns `true` when the grant applies. The parent document's own `read`
/// list is never touched.
pub fn apply_anonymity<D: RecordDocument + ?Sized>(doc: &mut D) -> bool {
    if !is_anonymous_safe(doc) {
        tracing::debug!(
            record_id = %doc.id(),
            schema = doc.schema_name(),
            "issuedTo identifies an individual; keeping it admin-only"
        );
        return false;
    }
    match doc.issued_to_mut() {
        Some(issued) => {
            issued.read.insert(Role::Public);
            true
        }
        None => false,
    }
}
