//! Device-local key/value persistence.
//!
//! [`KeyValueStore`] is the seam between client state and the platform's
//! storage. [`FileStore`] keeps every key in one JSON object on disk;
//! [`MemoryStore`] is for tests and ephemeral sessions.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::ClientResult;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> ClientResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    async fn remove(&self, key: &str) -> ClientResult<()>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// All keys in a single JSON file, loaded lazily and written through.
///
/// Writes go to a sibling temp file which is then renamed over the
/// original, so a crash mid-write leaves the previous contents intact.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> ClientResult<BTreeMap<String, String>> {
        match tokio::fs::read(path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `update` to a copy of the loaded map and persist it. The cached
    /// map only changes once the write has succeeded.
    async fn modify<F>(&self, update: F) -> ClientResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) + Send,
    {
        let mut guard = self.entries.lock().await;
        let mut next = match guard.as_ref() {
            Some(entries) => entries.clone(),
            None => Self::load(&self.path).await?,
        };
        update(&mut next);
        self.persist(&next).await?;
        *guard = Some(next);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(Self::load(&self.path).await?);
        }
        Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::ClientError;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("user_id").await.unwrap(), None);

        store.set("user_id", "CUST-00-0001").await.unwrap();
        assert_eq!(store.get("user_id").await.unwrap().as_deref(), Some("CUST-00-0001"));

        store.remove("user_id").await.unwrap();
        assert_eq!(store.get("user_id").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("storage.json");

        let store = FileStore::new(&path);
        store.set("user_id", "CUST-00-0001").await.unwrap();
        store.set("READ_PROMOS", "[]").await.unwrap();
        store.remove("READ_PROMOS").await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("user_id").await.unwrap().as_deref(),
            Some("CUST-00-0001")
        );
        assert_eq!(reopened.get("READ_PROMOS").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::new(&path);
        store.set("user_id", "CUST-00-0001").await.unwrap();

        // A directory where the temp file goes makes the next write fail.
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let result = store.set("user_token", "tok").await;
        assert_matches!(result, Err(ClientError::Storage(_)));
        assert_eq!(store.get("user_token").await.unwrap(), None);

        let result = store.remove("user_id").await;
        assert!(result.is_err());
        assert_eq!(
            store.get("user_id").await.unwrap().as_deref(),
            Some("CUST-00-0001")
        );
    }
}
