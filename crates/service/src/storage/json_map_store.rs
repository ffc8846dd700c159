use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::info;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a single JSON file and keeps the in-memory
/// map and the file in lockstep: every mutation runs under the write lock for
/// its whole read-modify-write-persist cycle, so concurrent mutations cannot
/// interleave and no update is lost. The file is replaced atomically
/// (serialize to `<path>.tmp`, then rename over the durable file), so a crash
/// mid-write never corrupts previously durable state.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + Serialize + DeserializeOwned + Clone + Send + Sync,
    V: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Initialize the store from a path. Creates the file with an empty map
    /// if missing; an unreadable or unparsable existing file is an error
    /// rather than a silent reset.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Persistence(format!("parse {}: {e}", file_path.display())))?,
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                write_atomic(&file_path, &empty).await?;
                info!(path = %file_path.display(), "initialized empty state file");
                empty
            }
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Consistent point-in-time copy of the whole map.
    pub async fn snapshot(&self) -> HashMap<K, V> {
        let map = self.inner.read().await;
        map.clone()
    }

    /// Apply a mutation and persist, all under the write lock.
    ///
    /// The mutation runs against a scratch copy which is persisted before it
    /// is swapped into memory, so a failed mutation or a failed write leaves
    /// both the in-memory map and the file exactly as they were.
    pub async fn with_map<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<T, ServiceError>,
    {
        let mut guard = self.inner.write().await;
        let mut scratch = guard.clone();
        let out = f(&mut scratch)?;
        write_atomic(&self.file_path, &scratch).await?;
        *guard = scratch;
        Ok(out)
    }
}

/// Full-state overwrite via temp file + rename.
async fn write_atomic<K, V>(path: &PathBuf, map: &HashMap<K, V>) -> Result<(), ServiceError>
where
    K: Eq + Hash + Serialize,
    V: Serialize,
{
    let tmp_path = path.with_extension("tmp");
    let data = serde_json::to_vec_pretty(map)
        .map_err(|e| ServiceError::Persistence(format!("serialize state: {e}")))?;
    fs::write(&tmp_path, data)
        .await
        .map_err(|e| ServiceError::Persistence(format!("write {}: {e}", tmp_path.display())))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ServiceError::Persistence(format!("replace {}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{name}_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn mutations_persist_across_reload() -> Result<(), anyhow::Error> {
        let tmp = temp_path("json_map_store");
        let store = JsonMapStore::<String, u64>::new(&tmp).await?;

        assert_eq!(store.snapshot().await.len(), 0);

        store
            .with_map(|m| {
                m.insert("a".into(), 1);
                m.insert("b".into(), 2);
                Ok(())
            })
            .await?;
        assert_eq!(store.get(&"a".into()).await, Some(1));

        let reloaded = JsonMapStore::<String, u64>::new(&tmp).await?;
        assert_eq!(reloaded.get(&"b".into()).await, Some(2));
        assert_eq!(reloaded.snapshot().await.len(), 2);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_changes_nothing() -> Result<(), anyhow::Error> {
        let tmp = temp_path("json_map_store_rollback");
        let store = JsonMapStore::<String, u64>::new(&tmp).await?;
        store.with_map(|m| {
            m.insert("a".into(), 1);
            Ok(())
        })
        .await?;

        let res: Result<(), ServiceError> = store
            .with_map(|m| {
                m.insert("a".into(), 99);
                Err(ServiceError::InvalidValue("boom".into()))
            })
            .await;
        assert!(res.is_err());

        // Neither memory nor the file saw the aborted write.
        assert_eq!(store.get(&"a".into()).await, Some(1));
        let reloaded = JsonMapStore::<String, u64>::new(&tmp).await?;
        assert_eq!(reloaded.get(&"a".into()).await, Some(1));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn no_tmp_residue_after_writes() -> Result<(), anyhow::Error> {
        let tmp = temp_path("json_map_store_tmp");
        let store = JsonMapStore::<String, u64>::new(&tmp).await?;
        store.with_map(|m| {
            m.insert("k".into(), 7);
            Ok(())
        })
        .await?;

        assert!(tokio::fs::metadata(tmp.with_extension("tmp")).await.is_err());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn unknown_keys_in_file_are_tolerated() -> Result<(), anyhow::Error> {
        let tmp = temp_path("json_map_store_extra");
        tokio::fs::write(&tmp, br#"{"known": 3, "stale": 9}"#).await?;

        let store = JsonMapStore::<String, u64>::new(&tmp).await?;
        assert_eq!(store.get(&"known".into()).await, Some(3));
        assert_eq!(store.get(&"stale".into()).await, Some(9));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_not_a_reset() {
        let tmp = temp_path("json_map_store_corrupt");
        tokio::fs::write(&tmp, b"{not json").await.expect("write");

        let res = JsonMapStore::<String, u64>::new(&tmp).await;
        assert!(matches!(res, Err(ServiceError::Persistence(_))));

        let _ = tokio::fs::remove_file(&tmp).await;
    }
}
