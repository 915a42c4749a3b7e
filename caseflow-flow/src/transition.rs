use serde_json::Value;

use caseflow_dto::{CollectionFlowStatus, EditScope, Step, StepPatch, StepState};

use crate::error::{FlowError, Result};
use crate::state::{put_collection_flow_state, read_state_strict};

/// 把指定步骤置为给定状态，返回更新后的 steps 数组。
///
/// 流程状态缺失或步骤不存在都是错误：按名字改一个不存在的步骤
/// 属于编程错误，不是正常分支。
pub fn set_step_state(context: &mut Value, step_name: &str, state: StepState) -> Result<Vec<Step>> {
    let mut flow = read_state_strict(context)?;

    let step = flow
        .steps
        .iter_mut()
        .find(|step| step.step_name == step_name)
        .ok_or_else(|| FlowError::StepNotFound(step_name.to_string()))?;
    step.state = state;

    put_collection_flow_state(context, &flow)?;
    Ok(flow.steps)
}

/// 对指定步骤做部分更新（state / reason / isCompleted）。
/// 查找规则与 [`set_step_state`] 一致：未命中步骤一律报错。
pub fn update_step(context: &mut Value, step_name: &str, patch: &StepPatch) -> Result<()> {
    let mut flow = read_state_strict(context)?;

    let step = flow
        .steps
        .iter_mut()
        .find(|step| step.step_name == step_name)
        .ok_or_else(|| FlowError::StepNotFound(step_name.to_string()))?;

    if let Some(state) = patch.state {
        step.state = state;
    }
    if let Some(reason) = &patch.reason {
        step.reason = Some(reason.clone());
    }
    if let Some(is_completed) = patch.is_completed {
        step.is_completed = is_completed;
    }

    put_collection_flow_state(context, &flow)?;
    Ok(())
}

/// 批量 edit 转移：命中的步骤全部置为 edit，整体状态置为 edit。
///
/// 始终作用在克隆上并返回新 context，调用方把结果交给事件分发器
/// 落库；原 context 不被改动。
pub fn set_steps_to_edit(context: &Value, scope: &EditScope) -> Result<Value> {
    let mut cloned = context.clone();
    let mut flow = read_state_strict(&cloned)?;

    // 点名的步骤必须全部存在，先校验再改
    if let EditScope::Steps(names) = scope {
        for name in names {
            if !flow.steps.iter().any(|step| &step.step_name == name) {
                return Err(FlowError::StepNotFound(name.clone()));
            }
        }
    }

    for step in flow.steps.iter_mut() {
        if scope.contains(&step.step_name) {
            step.state = StepState::Edit;
        }
    }
    flow.status = CollectionFlowStatus::Edit;

    put_collection_flow_state(&mut cloned, &flow)?;
    Ok(cloned)
}
