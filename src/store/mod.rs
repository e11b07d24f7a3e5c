//! Keyed JSON record storage.
//!
//! Every entity is a JSON document addressed by `(collection, id)`. The core
//! engines only see the [`Store`] trait; the file backend lays records out as
//! `data_dir/<collection>/<id>.json`, the memory backend keeps them in a map
//! for tests and ephemeral deployments.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

/// Collection holding user records, keyed by the derived email hash.
pub const USERS: &str = "users";
/// Collection holding auth tokens, keyed by token id.
pub const TOKENS: &str = "tokens";
/// Collection holding carts, keyed by cart id.
pub const CART: &str = "cart";
/// Collection holding the menu singleton.
pub const MENU: &str = "menu";
/// Id of the menu singleton record.
pub const MENU_RECORD: &str = "menu";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    AlreadyExists,
    #[error("storage error: {0}")]
    Io(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn read(&self, collection: &str, id: &str) -> Result<Value, StoreError>;
    async fn create(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError>;
    async fn update(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError>;
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Decode a raw record into an entity type.
pub fn decode<T: DeserializeOwned>(record: Value) -> Result<T, StoreError> {
    serde_json::from_value(record).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Encode an entity into a raw record.
pub fn encode<T: Serialize>(entity: &T) -> Result<Value, StoreError> {
    serde_json::to_value(entity).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Build the store selected by configuration.
pub async fn init(config: &StorageConfig) -> Result<Arc<dyn Store>> {
    match config.backend {
        StorageBackend::File => {
            info!("Using file store at {}", config.data_dir.display());
            Ok(Arc::new(FileStore::open(&config.data_dir).await?))
        }
        StorageBackend::Memory => {
            info!("Using in-memory store, records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
