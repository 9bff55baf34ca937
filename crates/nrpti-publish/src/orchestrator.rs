//! # Flavour Orchestrator
//!
//! Creates one logical record as a master document plus one flavour per
//! requested site, on a store with no multi-document transactions.
//!
//! ## Phases
//!
//! 1. **Build.** Every flavour builder whose key appears in the input runs
//!    against its merged input view. If any builder rejects, the operation
//!    fails before anything is written and the first rejection (in key
//!    order) is returned.
//! 2. **Link.** The master is built with the flavour ids as forward
//!    references; flavours that support it get `_master` set to the master
//!    id. The anonymous-safe grant is applied to every document.
//! 3. **Persist.** All documents are written concurrently, bounded by
//!    `max_concurrent_writes`, and every outcome is awaited.
//! 4. **Compensate.** If any write failed, every id built in this operation
//!    is deleted (retrying with backoff), and the original failure is
//!    returned together with the rollback outcome.
//!
//! Phases 3 and 4 run on a detached task: dropping the caller's future does
//! not stop a half-finished write set from being rolled back.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use nrpti_core::{
    Actor, FlavourKind, FlavourRecord, MasterRecord, RecordDocument, RecordId, RecordType,
};
use nrpti_policy::apply_anonymity;
use nrpti_store::{DocumentStore, StoreError, StoredDocument};

use crate::builder::{FlavourBuilders, MasterBuilder};
use crate::catalog::BuilderCatalog;
use crate::config::PublishConfig;
use crate::counters;
use crate::error::{CompensationError, PublishError, Rollback, ValidationError};
use crate::input::RecordInput;

/// Base delay before retrying a compensating delete. Doubles per attempt.
const DEFAULT_COMPENSATION_BACKOFF: Duration = Duration::from_millis(100);

/// A record set written by one creation operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publication {
    pub master: MasterRecord,
    pub flavours: Vec<FlavourRecord>,
}

impl Publication {
    /// The master id followed by every flavour id.
    pub fn ids(&self) -> Vec<RecordId> {
        std::iter::once(self.master.id)
            .chain(self.flavours.iter().map(|f| f.id))
            .collect()
    }

    pub fn flavour(&self, kind: FlavourKind) -> Option<&FlavourRecord> {
        self.flavours.iter().find(|f| f.flavour == kind)
    }

    pub fn into_parts(self) -> (MasterRecord, Vec<FlavourRecord>) {
        (self.master, self.flavours)
    }
}

/// Writes master + flavour record sets with compensating rollback.
///
/// Cheaply cloneable; clones share the store.
#[derive(Clone)]
pub struct FlavourOrchestrator {
    store: Arc<dyn DocumentStore>,
    catalog: BuilderCatalog,
    max_concurrent_writes: usize,
    compensation_retries: u32,
    compensation_backoff: Duration,
}

impl std::fmt::Debug for FlavourOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlavourOrchestrator")
            .field("catalog", &self.catalog)
            .field("max_concurrent_writes", &self.max_concurrent_writes)
            .field("compensation_retries", &self.compensation_retries)
            .field("compensation_backoff", &self.compensation_backoff)
            .finish_non_exhaustive()
    }
}

impl FlavourOrchestrator {
    pub fn new(store: Arc<dyn DocumentStore>, catalog: BuilderCatalog) -> Self {
        let defaults = PublishConfig::default();
        Self::from_config(store, catalog, &defaults)
    }

    pub fn from_config(
        store: Arc<dyn DocumentStore>,
        catalog: BuilderCatalog,
        config: &PublishConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            max_concurrent_writes: config.max_concurrent_writes.max(1),
            compensation_retries: config.compensation_retries,
            compensation_backoff: DEFAULT_COMPENSATION_BACKOFF,
        }
    }

    pub fn with_max_concurrent_writes(mut self, limit: usize) -> Self {
        self.max_concurrent_writes = limit.max(1);
        self
    }

    pub fn with_compensation_retries(mut self, retries: u32) -> Self {
        self.compensation_retries = retries;
        self
    }

    pub fn with_compensation_backoff(mut self, backoff: Duration) -> Self {
        self.compensation_backoff = backoff;
        self
    }

    pub fn catalog(&self) -> &BuilderCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Create a record of `record_type` with the standard builders.
    ///
    /// Flavours are selected by the flavour schema-name keys present in
    /// `input`. A key naming a site the record type is never published to
    /// is rejected.
    pub async fn create_record(
        &self,
        actor: &Actor,
        record_type: RecordType,
        input: &RecordInput,
    ) -> Result<Publication, PublishError> {
        if let Some(flavour) = unsupported_flavour_key(record_type, input) {
            counters::validation_rejection();
            tracing::warn!(
                record_type = %record_type,
                flavour = %flavour,
                "rejected unsupported flavour"
            );
            return Err(ValidationError::UnsupportedFlavour {
                record_type,
                flavour,
            }
            .into());
        }
        let master_builder = self.catalog.master_builder(record_type);
        let flavour_builders = self.catalog.flavour_builders(record_type);
        self.create_with_flavours(actor, input, &master_builder, &flavour_builders)
            .await
    }

    /// Build, link, persist and (on failure) roll back one record set.
    pub async fn create_with_flavours(
        &self,
        actor: &Actor,
        input: &RecordInput,
        master_builder: &dyn MasterBuilder,
        flavour_builders: &FlavourBuilders,
    ) -> Result<Publication, PublishError> {
        let publication = match build_record_set(actor, input, master_builder, flavour_builders) {
            Ok(publication) => publication,
            Err(err) => {
                counters::validation_rejection();
                return Err(err.into());
            }
        };

        let mut documents = Vec::with_capacity(publication.flavours.len() + 1);
        documents.push(stored(&publication.master)?);
        for flavour in &publication.flavours {
            documents.push(stored(flavour)?);
        }

        let task = tokio::spawn(persist_record_set(
            Arc::clone(&self.store),
            documents,
            self.max_concurrent_writes,
            self.compensation_retries,
            self.compensation_backoff,
        ));
        task.await
            .map_err(|e| PublishError::Internal(format!("persistence task failed: {e}")))??;

        counters::publication(publication.master.record_type);
        tracing::info!(
            master_id = %publication.master.id,
            record_type = %publication.master.record_type,
            flavours = publication.flavours.len(),
            added_by = %actor.display_name(),
            "record published"
        );
        Ok(publication)
    }
}

/// Build every requested flavour, then the master, then link them.
fn build_record_set(
    actor: &Actor,
    input: &RecordInput,
    master_builder: &dyn MasterBuilder,
    flavour_builders: &FlavourBuilders,
) -> Result<Publication, ValidationError> {
    let keys: Vec<&str> = flavour_builders.keys().map(String::as_str).collect();

    let mut flavours = Vec::new();
    let mut back_references = Vec::new();
    let mut rejections = Vec::new();
    for (key, builder) in flavour_builders {
        if input.get(key).map_or(true, |v| v.is_null()) {
            continue;
        }
        let built = input
            .merged_view(key, keys.iter().copied())
            .and_then(|view| builder.build(actor, &view));
        match built {
            Ok(doc) => {
                back_references.push(builder.supports_master_reference());
                flavours.push(doc);
            }
            Err(err) => rejections.push((key.as_str(), err)),
        }
    }

    let mut rejections = rejections.into_iter();
    if let Some((key, first)) = rejections.next() {
        for (other, err) in rejections {
            tracing::warn!(flavour = other, error = %err, "flavour builder also rejected input");
        }
        tracing::warn!(
            flavour = key,
            actor = %actor.display_name(),
            error = %first,
            "flavour builder rejected input; nothing written"
        );
        return Err(first);
    }

    let flavour_ids: Vec<RecordId> = flavours.iter().map(|f| f.id).collect();
    let mut master = master_builder.build(actor, input, &flavour_ids).map_err(|err| {
        tracing::warn!(
            actor = %actor.display_name(),
            error = %err,
            "master builder rejected input; nothing written"
        );
        err
    })?;

    for (flavour, linked) in flavours.iter_mut().zip(back_references) {
        if linked {
            flavour.master = Some(master.id);
        }
    }

    apply_anonymity(&mut master);
    for flavour in &mut flavours {
        apply_anonymity(flavour);
    }

    Ok(Publication { master, flavours })
}

/// A flavour key for `record_type` naming a site it is never published to.
fn unsupported_flavour_key(record_type: RecordType, input: &RecordInput) -> Option<FlavourKind> {
    input.keys().find_map(|key| {
        let base = key.strip_prefix(record_type.as_str())?;
        FlavourKind::all()
            .iter()
            .copied()
            .find(|f| f.suffix() == base && !record_type.supports(*f))
    })
}

fn stored<D>(doc: &D) -> Result<StoredDocument, PublishError>
where
    D: RecordDocument + Serialize,
{
    StoredDocument::from_record(doc).map_err(|e| match e {
        StoreError::Serialization(e) => PublishError::Serialization(e),
        other => PublishError::Internal(format!("encoding {}: {other}", doc.schema_name())),
    })
}

/// Write every document, then compensate if any write failed.
async fn persist_record_set(
    store: Arc<dyn DocumentStore>,
    documents: Vec<StoredDocument>,
    max_concurrent_writes: usize,
    compensation_retries: u32,
    compensation_backoff: Duration,
) -> Result<(), PublishError> {
    let ids: Vec<RecordId> = documents.iter().map(|d| d.id).collect();
    let outcomes = write_all(Arc::clone(&store), documents, max_concurrent_writes).await;

    let mut written = Vec::new();
    let mut first_failure = None;
    for (id, outcome) in ids.iter().zip(outcomes) {
        match outcome {
            Ok(_) => written.push(*id),
            Err(err) => {
                tracing::warn!(record_id = %id, error = %err, "document write failed");
                first_failure.get_or_insert(err);
            }
        }
    }

    let Some(source) = first_failure else {
        return Ok(());
    };

    let rollback = compensate(
        store.as_ref(),
        &ids,
        written,
        compensation_retries,
        compensation_backoff,
    )
    .await;
    counters::rollback(rollback.outcome());
    match &rollback {
        Rollback::Clean { deleted } => tracing::warn!(
            documents = ids.len(),
            deleted,
            "record set rolled back after write failure"
        ),
        Rollback::Orphaned(err) => tracing::error!(
            orphans = ?err.orphans,
            error = %err.source,
            "rollback failed; orphaned documents need reconciling"
        ),
    }
    Err(PublishError::Persistence { source, rollback })
}

/// Save each document on its own task, at most `limit` at a time. Outcomes
/// come back in input order.
async fn write_all(
    store: Arc<dyn DocumentStore>,
    documents: Vec<StoredDocument>,
    limit: usize,
) -> Vec<Result<RecordId, StoreError>> {
    let permits = Arc::new(Semaphore::new(limit));
    let mut tasks = JoinSet::new();
    let count = documents.len();
    for (index, doc) in documents.into_iter().enumerate() {
        let store = Arc::clone(&store);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(_permit) => store.save(doc).await,
                Err(_) => Err(StoreError::Unavailable("write limiter closed".to_string())),
            };
            (index, outcome)
        });
    }

    let mut outcomes: Vec<Option<Result<RecordId, StoreError>>> = (0..count).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(err) => tracing::error!(error = %err, "document write task aborted"),
        }
    }
    outcomes
        .into_iter()
        .map(|o| {
            o.unwrap_or_else(|| {
                Err(StoreError::Unavailable(
                    "write task did not complete".to_string(),
                ))
            })
        })
        .collect()
}

/// Delete every id of the operation, retrying with exponential backoff.
async fn compensate(
    store: &dyn DocumentStore,
    ids: &[RecordId],
    written: Vec<RecordId>,
    retries: u32,
    backoff: Duration,
) -> Rollback {
    let mut attempt = 0;
    loop {
        match store.delete_many(ids).await {
            Ok(deleted) => return Rollback::Clean { deleted },
            Err(err) if attempt < retries => {
                let delay = backoff * 2u32.saturating_pow(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = retries,
                    "compensating delete failed, retrying in {delay:?}: {err}"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                return Rollback::Orphaned(CompensationError {
                    orphans: written,
                    source: err,
                })
            }
        }
    }
}
