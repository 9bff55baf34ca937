//! In-memory document store using DashMap.
//!
//! Cheaply cloneable via `Arc`; all clones share the same data.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use nrpti_core::RecordId;

use crate::{DocumentStore, StoreError, StoredDocument};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<DashMap<RecordId, StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Ids of every stored document, sorted.
    pub fn ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.documents.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn save(&self, doc: StoredDocument) -> Result<RecordId, StoreError> {
        match self.documents.entry(doc.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(doc.id)),
            Entry::Vacant(slot) => {
                let id = doc.id;
                slot.insert(doc);
                Ok(id)
            }
        }
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, StoreError> {
        let removed = ids
            .iter()
            .filter(|id| self.documents.remove(*id).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn get(&self, id: RecordId) -> Result<Option<StoredDocument>, StoreError> {
        Ok(self.documents.get(&id).map(|e| e.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(name: &str) -> StoredDocument {
        StoredDocument {
            id: RecordId::new(),
            schema_name: "Order".to_string(),
            body: json!({ "recordName": name }),
        }
    }

    #[tokio::test]
    async fn save_then_get() {
        let store = MemoryStore::new();
        let d = doc("a");
        let id = store.save(d.clone()).await.unwrap();
        assert_eq!(id, d.id);
        assert_eq!(store.get(id).await.unwrap(), Some(d));
    }

    #[tokio::test]
    async fn duplicate_id_rejected() {
        let store = MemoryStore::new();
        let d = doc("a");
        store.save(d.clone()).await.unwrap();
        let err = store.save(d.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(id) if id == d.id));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_many_counts_only_present() {
        let store = MemoryStore::new();
        let a = doc("a");
        let b = doc("b");
        store.save(a.clone()).await.unwrap();
        store.save(b.clone()).await.unwrap();
        let removed = store
            .delete_many(&[a.id, RecordId::new(), a.id])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(!store.contains(a.id));
        assert!(store.contains(b.id));
    }

    #[tokio::test]
    async fn clones_share_data() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.save(doc("a")).await.unwrap();
        assert_eq!(clone.len(), 1);
    }
}
