//! In-memory record store used by tests and ephemeral deployments.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

use super::{Store, StoreError};
use async_trait::async_trait;

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key(collection: &str, id: &str) -> (String, String) {
    (collection.to_string(), id.to_string())
}

#[async_trait]
impl Store for MemoryStore {
    async fn read(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        self.records
            .read()
            .get(&key(collection, id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if records.contains_key(&key(collection, id)) {
            return Err(StoreError::AlreadyExists);
        }
        records.insert(key(collection, id), record);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        let mut records = self.records.write();
        match records.get_mut(&key(collection, id)) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.records
            .write()
            .remove(&key(collection, id))
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = MemoryStore::new();

        store.create("users", "k", json!({"v": 1})).await.unwrap();
        assert!(matches!(
            store.create("users", "k", json!({"v": 2})).await.unwrap_err(),
            StoreError::AlreadyExists
        ));

        assert_eq!(store.read("users", "k").await.unwrap(), json!({"v": 1}));

        store.update("users", "k", json!({"v": 2})).await.unwrap();
        assert_eq!(store.read("users", "k").await.unwrap(), json!({"v": 2}));

        store.delete("users", "k").await.unwrap();
        assert!(matches!(
            store.read("users", "k").await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_collections_are_disjoint() {
        let store = MemoryStore::new();
        store.create("users", "same-id", json!("user")).await.unwrap();
        store.create("tokens", "same-id", json!("token")).await.unwrap();

        assert_eq!(store.read("users", "same-id").await.unwrap(), json!("user"));
        assert_eq!(store.read("tokens", "same-id").await.unwrap(), json!("token"));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.update("cart", "nope", json!({})).await.unwrap_err(),
            StoreError::NotFound
        ));
    }
}
