//! Key/value stores
//!
//! Values are JSON documents. [`JsonFileStore`] keeps the whole map in one
//! file and rewrites it through a temporary file on every change.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::PersistenceError;

/// Persistent key/value storage
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError>;

    /// Store or overwrite `key`
    async fn set(&self, key: &str, value: Value) -> Result<(), PersistenceError>;

    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Store backed by a single JSON object on disk
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<HashMap<String, Value>, PersistenceError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(PersistenceError::InvalidData(format!(
                "expected a JSON object in {}, found {}",
                self.path.display(),
                kind_of(&other)
            ))),
        }
    }

    async fn write_map(&self, map: &HashMap<String, Value>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(map)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl LocalStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value);
        self.write_map(&map).await?;
        tracing::debug!(key, path = %self.path.display(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

/// Volatile store, for tests and when no mirror file is configured
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), PersistenceError> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.values.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local_storage.json");

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get("healthData").await.unwrap(), None);

        store.set("healthData", json!({"bmi": 22.5})).await.unwrap();
        store.set("theme", json!("dark")).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get("healthData").await.unwrap(),
            Some(json!({"bmi": 22.5}))
        );
        assert_eq!(reopened.get("theme").await.unwrap(), Some(json!("dark")));
    }

    #[tokio::test]
    async fn test_file_store_overwrite_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));

        store.set("k", json!(1)).await.unwrap();
        store.set("k", json!(2)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.remove("never-set").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get("k").await,
            Err(PersistenceError::InvalidData(_))
        ));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            store.get("k").await,
            Err(PersistenceError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryStore::new();
        store.set("a", json!({"x": 1})).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(json!({"x": 1})));
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
