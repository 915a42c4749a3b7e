use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dto::flow::StepState;
use crate::dto::merge::ArrayMergeOption;

/// 对单个步骤的部分更新（不含 `step_name` 本身）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StepState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

/// 批量进入 edit 态的目标集合：哨兵值 `"all"` 或步骤名列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditScope {
    Sentinel(EditSentinel),
    Steps(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditSentinel {
    All,
}

impl EditScope {
    pub fn all() -> Self {
        EditScope::Sentinel(EditSentinel::All)
    }

    /// 判断给定步骤是否落在本次 edit 范围内
    pub fn contains(&self, step_name: &str) -> bool {
        match self {
            EditScope::Sentinel(EditSentinel::All) => true,
            EditScope::Steps(names) => names.iter().any(|n| n == step_name),
        }
    }
}

/// 对 case context 的一次命名变更事件
///
/// 所有 context 写入都从这里走；两个内建事件沿用原有线上格式
/// （`DEEP_MERGE_CONTEXT` / `UPDATE_CONTEXT`），业务事件用 camelCase。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CaseEvent {
    #[serde(rename = "DEEP_MERGE_CONTEXT")]
    DeepMergeContext {
        new_context: Value,
        array_merge_option: ArrayMergeOption,
    },

    #[serde(rename = "UPDATE_CONTEXT")]
    UpdateContext { context: Value },

    SetStepState {
        step_name: String,
        state: StepState,
    },

    UpdateStep {
        step_name: String,
        patch: StepPatch,
    },

    /// 完成一个步骤：置 completed + isCompleted，并刷新派生字段
    CompleteStep { step_name: String },

    /// 批量把步骤置为 edit，同时整体状态进入 edit
    BeginEdit { scope: EditScope },
}

impl CaseEvent {
    /// 事件名（即 wire 上的 `type` 标签）
    pub fn event_type(&self) -> &'static str {
        match self {
            CaseEvent::DeepMergeContext { .. } => "DEEP_MERGE_CONTEXT",
            CaseEvent::UpdateContext { .. } => "UPDATE_CONTEXT",
            CaseEvent::SetStepState { .. } => "setStepState",
            CaseEvent::UpdateStep { .. } => "updateStep",
            CaseEvent::CompleteStep { .. } => "completeStep",
            CaseEvent::BeginEdit { .. } => "beginEdit",
        }
    }
}
