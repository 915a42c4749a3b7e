use serde_json::Value;

use caseflow_context::{get_path, set_path};
use caseflow_dto::{CollectionFlowState, CollectionFlowStatus, Step};

use crate::error::{FlowError, Result};

/// 流程状态在 context 内的固定挂载路径
pub const COLLECTION_FLOW_STATE_PATH: &str = "collectionFlow.state";

/// 读取流程状态；路径缺失返回 `None`
pub fn get_collection_flow_state(context: &Value) -> Option<CollectionFlowState> {
    let raw = get_path(context, COLLECTION_FLOW_STATE_PATH)?;
    serde_json::from_value(raw.clone()).ok()
}

/// 把流程状态写回 context 的固定路径
pub fn put_collection_flow_state(context: &mut Value, state: &CollectionFlowState) -> Result<()> {
    set_path(
        context,
        COLLECTION_FLOW_STATE_PATH,
        serde_json::to_value(state)?,
    )?;
    Ok(())
}

/// 严格读取：路径缺失或形状损坏都视为流程状态不存在
pub(crate) fn read_state_strict(context: &Value) -> Result<CollectionFlowState> {
    let raw = get_path(context, COLLECTION_FLOW_STATE_PATH).ok_or(FlowError::StateNotFound)?;
    Ok(serde_json::from_value(raw.clone())?)
}

/// 按步骤名顺序构造初始流程状态：全部 idle，整体 pending，
/// currentStep 指向第一个步骤。
pub fn build_collection_flow_state<I, S>(step_names: I) -> CollectionFlowState
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let steps: Vec<Step> = step_names.into_iter().map(Step::new).collect();
    let current_step = steps
        .first()
        .map(|step| step.step_name.clone())
        .unwrap_or_default();

    CollectionFlowState {
        current_step,
        status: CollectionFlowStatus::Pending,
        steps,
    }
}
