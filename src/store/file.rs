//! File-backed record store, one pretty-printed JSON document per record.

use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{Store, StoreError};
use async_trait::async_trait;

pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base`, creating the directory if needed.
    pub async fn open(base: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(base)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self {
            base: base.to_path_buf(),
        })
    }

    fn path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        if !valid_segment(collection) || !valid_segment(id) {
            return Err(StoreError::Io(format!(
                "invalid record address: {collection}/{id}"
            )));
        }
        Ok(self.base.join(collection).join(format!("{id}.json")))
    }
}

/// Record addresses become file names, so they must stay inside the
/// collection directory.
fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn io_error(e: std::io::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

#[async_trait]
impl Store for FileStore {
    async fn read(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let path = self.path(collection, id)?;
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(io_error(e)),
        };
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn create(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        let path = self.path(collection, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let body =
            serde_json::to_string_pretty(&record).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists)
            }
            Err(e) => return Err(io_error(e)),
        };
        file.write_all(body.as_bytes()).await.map_err(io_error)?;
        file.flush().await.map_err(io_error)
    }

    async fn update(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        let path = self.path(collection, id)?;
        match fs::metadata(&path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(io_error(e)),
        }

        let body =
            serde_json::to_string_pretty(&record).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        fs::write(&path, body).await.map_err(io_error)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let path = self.path(collection, id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(io_error(e)),
        }
    }
}
