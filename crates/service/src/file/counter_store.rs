use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::counter::store::CounterStore;
use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed counter store. Keeps a map of `program id -> count` persisted
/// as JSON, one atomic full-state write per mutation.
pub struct FileCounterStore {
    store: Arc<JsonMapStore<String, u64>>,
}

impl FileCounterStore {
    /// Initialize the store from the given file path. Creates the file if
    /// missing; unknown keys in an existing file are kept as-is.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, u64>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait]
impl CounterStore for FileCounterStore {
    async fn get(&self, program_id: &str) -> u64 {
        self.store.get(&program_id.to_string()).await.unwrap_or(0)
    }

    async fn increment(&self, program_id: &str) -> Result<u64, ServiceError> {
        let key = program_id.to_string();
        self.store
            .with_map(move |m| {
                let next = m.get(&key).copied().unwrap_or(0).saturating_add(1);
                m.insert(key, next);
                Ok(next)
            })
            .await
    }

    async fn decrement(&self, program_id: &str) -> Result<u64, ServiceError> {
        let key = program_id.to_string();
        self.store
            .with_map(move |m| {
                let next = m.get(&key).copied().unwrap_or(0).saturating_sub(1);
                m.insert(key, next);
                Ok(next)
            })
            .await
    }

    async fn set_exact(&self, program_id: &str, value: u64) -> Result<u64, ServiceError> {
        let key = program_id.to_string();
        self.store
            .with_map(move |m| {
                m.insert(key, value);
                Ok(value)
            })
            .await
    }

    async fn initialize_missing(&self, known_ids: &[String]) -> Result<(), ServiceError> {
        let ids = known_ids.to_vec();
        self.store
            .with_map(move |m| {
                for id in ids {
                    m.entry(id).or_insert(0);
                }
                Ok(())
            })
            .await
    }

    async fn snapshot(&self) -> HashMap<String, u64> {
        self.store.snapshot().await
    }
}
