//! Builder traits.
//!
//! Builders are pure constructors: they validate the actor and input, and
//! return an unpersisted document carrying a freshly allocated id. They must
//! not write anywhere, so a retried operation can call them again safely.
//!
//! Any `Fn` with the right signature is a builder.

use std::collections::BTreeMap;

use nrpti_core::{Actor, FlavourRecord, MasterRecord, RecordId};

use crate::error::ValidationError;
use crate::input::RecordInput;

/// Builds one site-specific flavour document from its merged input view.
pub trait FlavourBuilder: Send + Sync {
    fn build(&self, actor: &Actor, input: &RecordInput) -> Result<FlavourRecord, ValidationError>;

    /// Whether built documents carry a `_master` back-reference.
    fn supports_master_reference(&self) -> bool {
        true
    }
}

/// Builds the master document, given the ids of the flavours built for it.
pub trait MasterBuilder: Send + Sync {
    fn build(
        &self,
        actor: &Actor,
        input: &RecordInput,
        flavour_ids: &[RecordId],
    ) -> Result<MasterRecord, ValidationError>;
}

impl<F> FlavourBuilder for F
where
    F: Fn(&Actor, &RecordInput) -> Result<FlavourRecord, ValidationError> + Send + Sync,
{
    fn build(&self, actor: &Actor, input: &RecordInput) -> Result<FlavourRecord, ValidationError> {
        self(actor, input)
    }
}

impl<F> MasterBuilder for F
where
    F: Fn(&Actor, &RecordInput, &[RecordId]) -> Result<MasterRecord, ValidationError>
        + Send
        + Sync,
{
    fn build(
        &self,
        actor: &Actor,
        input: &RecordInput,
        flavour_ids: &[RecordId],
    ) -> Result<MasterRecord, ValidationError> {
        self(actor, input, flavour_ids)
    }
}

/// Flavour builders keyed by the input key that selects them (the flavour
/// schema name). Iteration order is key order.
pub type FlavourBuilders = BTreeMap<String, Box<dyn FlavourBuilder>>;
