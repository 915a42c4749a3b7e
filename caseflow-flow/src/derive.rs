//! 派生字段计算
//!
//! `currentStep` 和整体 `status` 是从 steps 推导出来的快照字段，
//! 审核动作（revision/edit）发生后由这里统一刷新。

use serde_json::Value;

use caseflow_dto::{CollectionFlowState, CollectionFlowStatus, StepState};

use crate::error::Result;
use crate::state::{put_collection_flow_state, read_state_strict};

/// 当前应该停留的步骤
///
/// revision 状态优先停在第一个待返工步骤，edit 状态停在第一个
/// edit 步骤，否则取第一个未完成步骤；全部完成时返回 `None`。
pub fn compute_current_step(state: &CollectionFlowState) -> Option<&str> {
    if state.status == CollectionFlowStatus::Revision {
        if let Some(step) = state
            .steps
            .iter()
            .find(|step| step.state == StepState::Revision)
        {
            return Some(&step.step_name);
        }
    }

    if state.status == CollectionFlowStatus::Edit {
        if let Some(step) = state.steps.iter().find(|step| step.state == StepState::Edit) {
            return Some(&step.step_name);
        }
    }

    state
        .steps
        .iter()
        .find(|step| step.state != StepState::Completed)
        .map(|step| step.step_name.as_str())
}

/// 整体状态推导：failed / edit 粘滞，任一步骤 revision 即 revision，
/// 全部完成即 completed，否则维持现状。
pub fn compute_current_status(state: &CollectionFlowState) -> CollectionFlowStatus {
    if state.status == CollectionFlowStatus::Failed {
        return CollectionFlowStatus::Failed;
    }

    if state.status == CollectionFlowStatus::Edit {
        return CollectionFlowStatus::Edit;
    }

    if state
        .steps
        .iter()
        .any(|step| step.state == StepState::Revision)
    {
        return CollectionFlowStatus::Revision;
    }

    if !state.steps.is_empty()
        && state
            .steps
            .iter()
            .all(|step| step.state == StepState::Completed)
    {
        return CollectionFlowStatus::Completed;
    }

    state.status
}

/// 重新计算两个派生字段并写回 context
pub fn refresh_derived_state(context: &mut Value) -> Result<()> {
    let mut flow = read_state_strict(context)?;

    flow.status = compute_current_status(&flow);
    flow.current_step = compute_current_step(&flow).unwrap_or_default().to_string();

    put_collection_flow_state(context, &flow)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_dto::Step;
    use serde_json::json;

    fn state_with(states: &[(&str, StepState)], status: CollectionFlowStatus) -> CollectionFlowState {
        CollectionFlowState {
            current_step: String::new(),
            status,
            steps: states
                .iter()
                .map(|(name, state)| Step {
                    step_name: name.to_string(),
                    state: *state,
                    reason: None,
                    is_completed: *state == StepState::Completed,
                })
                .collect(),
        }
    }

    #[test]
    fn test_current_step_prefers_revision_step() {
        let state = state_with(
            &[
                ("s1", StepState::Completed),
                ("s2", StepState::Revision),
                ("s3", StepState::Idle),
            ],
            CollectionFlowStatus::Revision,
        );
        assert_eq!(compute_current_step(&state), Some("s2"));
    }

    #[test]
    fn test_current_step_prefers_edit_step_in_edit_status() {
        let state = state_with(
            &[("s1", StepState::Completed), ("s2", StepState::Edit)],
            CollectionFlowStatus::Edit,
        );
        assert_eq!(compute_current_step(&state), Some("s2"));
    }

    #[test]
    fn test_current_step_falls_back_to_first_incomplete() {
        let state = state_with(
            &[("s1", StepState::Completed), ("s2", StepState::InProgress)],
            CollectionFlowStatus::InProgress,
        );
        assert_eq!(compute_current_step(&state), Some("s2"));
    }

    #[test]
    fn test_current_step_none_when_all_completed() {
        let state = state_with(
            &[("s1", StepState::Completed)],
            CollectionFlowStatus::Completed,
        );
        assert_eq!(compute_current_step(&state), None);
    }

    #[test]
    fn test_status_revision_wins_over_progress() {
        let state = state_with(
            &[("s1", StepState::Revision), ("s2", StepState::Idle)],
            CollectionFlowStatus::InProgress,
        );
        assert_eq!(compute_current_status(&state), CollectionFlowStatus::Revision);
    }

    #[test]
    fn test_status_failed_and_edit_are_sticky() {
        let failed = state_with(&[("s1", StepState::Completed)], CollectionFlowStatus::Failed);
        assert_eq!(compute_current_status(&failed), CollectionFlowStatus::Failed);

        let edit = state_with(&[("s1", StepState::Revision)], CollectionFlowStatus::Edit);
        assert_eq!(compute_current_status(&edit), CollectionFlowStatus::Edit);
    }

    #[test]
    fn test_status_completed_when_all_steps_done() {
        let state = state_with(
            &[("s1", StepState::Completed), ("s2", StepState::Completed)],
            CollectionFlowStatus::InProgress,
        );
        assert_eq!(compute_current_status(&state), CollectionFlowStatus::Completed);
    }

    #[test]
    fn test_refresh_writes_back_derived_fields() {
        let mut context = json!({
            "collectionFlow": {
                "state": {
                    "currentStep": "s1",
                    "status": "inProgress",
                    "steps": [
                        { "stepName": "s1", "state": "completed", "isCompleted": true },
                        { "stepName": "s2", "state": "completed", "isCompleted": true }
                    ]
                }
            }
        });
        refresh_derived_state(&mut context).unwrap();

        let state = &context["collectionFlow"]["state"];
        assert_eq!(state["status"], "completed");
        assert_eq!(state["currentStep"], "");
    }
}
