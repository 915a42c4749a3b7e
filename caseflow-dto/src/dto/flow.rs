use serde::{Deserialize, Serialize};

/// 单个采集步骤的生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepState {
    Idle,
    InProgress,
    Completed,
    Revision,
    Revised,
    Edit,
}

impl Default for StepState {
    fn default() -> Self {
        StepState::Idle
    }
}

/// 采集流程的整体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionFlowStatus {
    Pending,
    InProgress,
    Completed,
    Revision,
    Edit,
    Failed,
}

impl Default for CollectionFlowStatus {
    fn default() -> Self {
        CollectionFlowStatus::Pending
    }
}

/// 采集流程中的一个命名步骤
///
/// `step_name` 在 `steps[]` 内唯一；所有按名字定位步骤的操作都以它为键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_name: String,

    #[serde(default)]
    pub state: StepState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default)]
    pub is_completed: bool,
}

impl Step {
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            state: StepState::Idle,
            reason: None,
            is_completed: false,
        }
    }
}

/// 挂在 context `collectionFlow.state` 路径下的流程状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFlowState {
    #[serde(default)]
    pub current_step: String,

    #[serde(default)]
    pub status: CollectionFlowStatus,

    #[serde(default)]
    pub steps: Vec<Step>,
}
