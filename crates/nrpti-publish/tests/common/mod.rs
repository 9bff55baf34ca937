//! Shared fixtures: a fault-injecting store and standard actors.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use nrpti_core::{Actor, RecordId};
use nrpti_legislation::LegislationResolver;
use nrpti_publish::{BuilderCatalog, FlavourOrchestrator};
use nrpti_store::{DocumentStore, MemoryStore, StoreError, StoredDocument};

/// A `MemoryStore` that can fail or slow down chosen operations.
#[derive(Clone, Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    failing_schemas: Arc<Mutex<HashSet<String>>>,
    slow_schemas: Arc<Mutex<HashMap<String, Duration>>>,
    save_delay: Arc<Mutex<Duration>>,
    failing_deletes: Arc<AtomicU32>,
    delete_calls: Arc<AtomicU32>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every save of documents with this schema name.
    pub fn fail_saves_of(self, schema: &str) -> Self {
        self.failing_schemas
            .lock()
            .unwrap()
            .insert(schema.to_string());
        self
    }

    /// Delay saves of this schema name before they complete (or fail).
    pub fn slow_saves_of(self, schema: &str, delay: Duration) -> Self {
        self.slow_schemas
            .lock()
            .unwrap()
            .insert(schema.to_string(), delay);
        self
    }

    /// Delay every save.
    pub fn with_save_delay(self, delay: Duration) -> Self {
        *self.save_delay.lock().unwrap() = delay;
        self
    }

    /// Fail the next `n` `delete_many` calls.
    pub fn fail_deletes(self, n: u32) -> Self {
        self.failing_deletes.store(n, Ordering::SeqCst);
        self
    }

    pub fn delete_calls(&self) -> u32 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn save(&self, doc: StoredDocument) -> Result<RecordId, StoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = {
            let base = *self.save_delay.lock().unwrap();
            let slow = self.slow_schemas.lock().unwrap().get(&doc.schema_name).copied();
            slow.unwrap_or(base)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let fail = self
            .failing_schemas
            .lock()
            .unwrap()
            .contains(&doc.schema_name);
        let result = if fail {
            Err(StoreError::Unavailable(format!(
                "injected write failure for {}",
                doc.schema_name
            )))
        } else {
            self.inner.save(doc).await
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_deletes.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_deletes.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("injected delete failure".to_string()));
        }
        self.inner.delete_many(ids).await
    }

    async fn get(&self, id: RecordId) -> Result<Option<StoredDocument>, StoreError> {
        self.inner.get(id).await
    }
}

pub fn catalog() -> BuilderCatalog {
    BuilderCatalog::new(LegislationResolver::bundled().unwrap())
}

pub fn orchestrator(store: &FaultyStore) -> FlavourOrchestrator {
    FlavourOrchestrator::new(Arc::new(store.clone()), catalog())
        .with_compensation_backoff(Duration::from_millis(1))
}

pub fn sysadmin() -> Actor {
    Actor::from_role_strings("Sys Admin", ["sysadmin"])
}

pub fn lng_admin() -> Actor {
    Actor::from_role_strings("Lee Admin", ["admin:lng"])
}

pub fn nrced_admin() -> Actor {
    Actor::from_role_strings("Kim Admin", ["admin:nrced"])
}
