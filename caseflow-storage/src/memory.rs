use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::error::StorageError;
use crate::store::{ContextRecord, ContextStore};

/// 内存实现：测试与单进程部署用
pub struct MemoryContextStore {
    records: RwLock<HashMap<String, ContextRecord>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryContextStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ContextStore for MemoryContextStore {
    async fn create(&self, case_id: &str, context: Value) -> Result<ContextRecord, StorageError> {
        let mut records = self.records.write().await;
        if records.contains_key(case_id) {
            return Err(StorageError::AlreadyExists(case_id.to_string()));
        }
        let record = ContextRecord {
            context,
            revision: 1,
        };
        records.insert(case_id.to_string(), record.clone());
        Ok(record)
    }

    async fn load(&self, case_id: &str) -> Result<ContextRecord, StorageError> {
        self.records
            .read()
            .await
            .get(case_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(case_id.to_string()))
    }

    async fn save(
        &self,
        case_id: &str,
        context: Value,
        expected_revision: u64,
    ) -> Result<ContextRecord, StorageError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(case_id)
            .ok_or_else(|| StorageError::NotFound(case_id.to_string()))?;

        if record.revision != expected_revision {
            return Err(StorageError::RevisionConflict {
                case_id: case_id.to_string(),
                expected: expected_revision,
                actual: record.revision,
            });
        }

        record.context = context;
        record.revision += 1;
        Ok(record.clone())
    }

    async fn case_lock(&self, case_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(case_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
