use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 数组合并策略
///
/// * `ById`    → 按 `id` 字段做 upsert，保留既有元素及其顺序
/// * `Replace` → 新数组整体替换旧数组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayMergeOption {
    #[serde(rename = "BY_ID")]
    ById,
    #[serde(rename = "REPLACE")]
    Replace,
}

/// 一次合并操作（只在单次事件分发内存在）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOperation {
    pub new_context: Value,
    pub array_merge_option: ArrayMergeOption,
}
