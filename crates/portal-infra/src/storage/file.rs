//! JSON-file backed local store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use portal_core::ports::{SessionStorage, StorageError};

/// Persistent local store. The whole map is kept in memory and rewritten to
/// disk on every change (write to a temp file, then rename). A change only
/// becomes visible once it is on disk.
///
/// Values never expire; TTLs are ignored.
pub struct FileStore {
    path: PathBuf,
    store: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing contents. A missing file is
    /// an empty store; an unreadable or corrupt one is an error.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let store = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(StorageError::Unavailable(format!("{}: {e}", path.display())));
            }
        };

        tracing::info!(path = %path.display(), entries = store.len(), "File store opened");
        Ok(Self {
            path,
            store: RwLock::new(store),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, store: &HashMap<String, String>) -> Result<(), StorageError> {
        let json =
            serde_json::to_vec_pretty(store).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StorageError::Write(format!("{}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::Write(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl SessionStorage for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        let mut next = store.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next).await?;
        *store = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        if !store.contains_key(key) {
            return Ok(());
        }
        let mut next = store.clone();
        next.remove(key);
        self.persist(&next).await?;
        *store = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("portal-file-store-{}-{name}.json", std::process::id()))
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let _ = tokio::fs::remove_file(&path).await;

        let store = FileStore::open(&path).await.unwrap();
        store.set("userData", r#"{"codigo":"1"}"#, None).await.unwrap();
        store.set("isLoggedIn", "true", None).await.unwrap();
        store.remove("isLoggedIn").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("userData").await.unwrap().as_deref(),
            Some(r#"{"codigo":"1"}"#)
        );
        assert_eq!(reopened.get("isLoggedIn").await.unwrap(), None);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, b"not json").await.unwrap();
        assert!(matches!(
            FileStore::open(&path).await,
            Err(StorageError::Serialization(_))
        ));
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let dir = std::env::temp_dir().join(format!("portal-file-store-{}-gone", std::process::id()));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("userData", "kept", None).await.unwrap();
        tokio::fs::remove_dir_all(&dir).await.unwrap();

        assert!(matches!(
            store.set("isLoggedIn", "true", None).await,
            Err(StorageError::Write(_))
        ));
        assert_eq!(store.get("isLoggedIn").await.unwrap(), None);

        assert!(store.remove("userData").await.is_err());
        assert_eq!(store.get("userData").await.unwrap().as_deref(), Some("kept"));
    }
}
