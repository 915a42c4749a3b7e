use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::StorageError;

/// 一个 case 的 context 快照及其版本号
///
/// `revision` 是保存时的乐观并发基线：调用方读到哪个版本，
/// 保存时就带回哪个版本，过期即冲突。
#[derive(Debug, Clone, PartialEq)]
pub struct ContextRecord {
    pub context: Value,
    pub revision: u64,
}

/// context 持久化边界
///
/// 实现负责按 case 存取 context blob；事务/表结构不在本 crate 范围内。
/// `case_lock` 暴露单行锁，编排层在 load → save 期间持有它以串行化
/// 同一 case 的写入。
#[async_trait::async_trait]
pub trait ContextStore: Send + Sync {
    /// Create a new case with an initial context (revision starts at 1)
    async fn create(&self, case_id: &str, context: Value) -> Result<ContextRecord, StorageError>;

    /// Load the current context snapshot for a case
    async fn load(&self, case_id: &str) -> Result<ContextRecord, StorageError>;

    /// Save a new context; fails with `RevisionConflict` when
    /// `expected_revision` is stale
    async fn save(
        &self,
        case_id: &str,
        context: Value,
        expected_revision: u64,
    ) -> Result<ContextRecord, StorageError>;

    /// Per-case row lock handle
    async fn case_lock(&self, case_id: &str) -> Arc<Mutex<()>>;
}
