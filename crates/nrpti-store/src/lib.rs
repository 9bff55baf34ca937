//! # nrpti-store: Document Store
//!
//! The persistence collaborator for record publication. The store offers
//! per-document durability only: there is no multi-document transaction, so
//! callers that write related documents must compensate on partial failure
//! themselves.
//!
//! Two adapters:
//!
//! - [`MemoryStore`]: `DashMap`-backed, for tests and local runs.
//! - [`PgDocumentStore`]: PostgreSQL via SQLx, one JSONB row per document.

pub mod error;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use nrpti_core::{RecordDocument, RecordId};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A document as held by the store: its id, schema name and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: RecordId,
    pub schema_name: String,
    pub body: serde_json::Value,
}

impl StoredDocument {
    /// Serialize a master or flavour document for storage.
    pub fn from_record<D>(doc: &D) -> Result<Self, StoreError>
    where
        D: RecordDocument + Serialize,
    {
        Ok(Self {
            id: doc.id(),
            schema_name: doc.schema_name().to_string(),
            body: serde_json::to_value(doc)?,
        })
    }

    /// Decode the body into a document type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.body.clone()).map_err(|e| StoreError::Corrupt {
            id: self.id,
            reason: e.to_string(),
        })
    }
}

/// Per-document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. Fails if the id already exists.
    async fn save(&self, doc: StoredDocument) -> Result<RecordId, StoreError>;

    /// Delete every listed document, returning how many existed. Absent ids
    /// are not an error.
    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, StoreError>;

    async fn get(&self, id: RecordId) -> Result<Option<StoredDocument>, StoreError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn save(&self, doc: StoredDocument) -> Result<RecordId, StoreError> {
        (**self).save(doc).await
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, StoreError> {
        (**self).delete_many(ids).await
    }

    async fn get(&self, id: RecordId) -> Result<Option<StoredDocument>, StoreError> {
        (**self).get(id).await
    }
}
