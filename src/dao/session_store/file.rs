use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;

use crate::dao::{
    session_store::{KEY_PREFIX, KeyValueStore},
    storage::{StorageError, StorageResult},
};

/// Probe key written and removed to verify the directory is writable.
const PROBE_KEY: &str = "__storage_test__";

/// Durable key-value store keeping one JSON file per key inside a
/// directory. Survives restarts; never assumed to be transactional.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: Arc<PathBuf>,
}

impl FileStore {
    /// Open (creating if needed) the storage directory and verify it is
    /// writable with a probe entry.
    pub fn open(dir: &Path) -> StorageResult<Self> {
        std::fs::create_dir_all(dir).map_err(|source| {
            StorageError::unavailable(
                format!("creating storage directory `{}`", dir.display()),
                source,
            )
        })?;

        let store = Self {
            dir: Arc::new(dir.to_path_buf()),
        };

        store.probe()?;
        Ok(store)
    }

    fn probe(&self) -> StorageResult<()> {
        let path = self.entry_path(PROBE_KEY);
        std::fs::write(&path, PROBE_KEY).map_err(|source| {
            StorageError::unavailable(format!("writing probe `{}`", path.display()), source)
        })?;
        std::fs::remove_file(&path).map_err(|source| {
            StorageError::unavailable(format!("removing probe `{}`", path.display()), source)
        })?;
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{KEY_PREFIX}{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => Ok(Some(contents)),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(source) => Err(StorageError::unavailable(
                    format!("reading `{}`", path.display()),
                    source,
                )),
            }
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            tokio::fs::write(&path, value).await.map_err(|source| {
                StorageError::unavailable(format!("writing `{}`", path.display()), source)
            })
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.entry_path(key);
        Box::pin(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(StorageError::unavailable(
                    format!("removing `{}`", path.display()),
                    source,
                )),
            }
        })
    }

    fn clear(&self) -> BoxFuture<'static, StorageResult<()>> {
        let dir = Arc::clone(&self.dir);
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(dir.as_path()).await.map_err(|source| {
                StorageError::unavailable(format!("listing `{}`", dir.display()), source)
            })?;

            while let Some(entry) = entries.next_entry().await.map_err(|source| {
                StorageError::unavailable(format!("listing `{}`", dir.display()), source)
            })? {
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                if !name.starts_with(KEY_PREFIX) {
                    continue;
                }
                tokio::fs::remove_file(entry.path()).await.map_err(|source| {
                    StorageError::unavailable(
                        format!("removing `{}`", entry.path().display()),
                        source,
                    )
                })?;
            }

            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.probe() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persists_values_under_prefixed_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("session", "{\"id\":1}".into()).await.unwrap();
        assert!(dir.path().join("riddle_rush_session.json").exists());
        assert_eq!(
            store.get("session").await.unwrap().as_deref(),
            Some("{\"id\":1}")
        );
    }

    #[tokio::test]
    async fn missing_keys_read_as_none_and_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("absent").await.unwrap(), None);
        store.remove("absent").await.unwrap();
    }

    #[tokio::test]
    async fn clear_only_touches_namespaced_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("history", "[]".into()).await.unwrap();
        std::fs::write(dir.path().join("unrelated.json"), "keep").unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.get("history").await.unwrap(), None);
        assert!(dir.path().join("unrelated.json").exists());
    }

    #[tokio::test]
    async fn reopening_sees_previous_values() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("settings", "{}".into()).await.unwrap();
        }
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("settings").await.unwrap().as_deref(), Some("{}"));
    }
}
