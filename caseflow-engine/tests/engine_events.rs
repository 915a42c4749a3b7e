use std::sync::Arc;

use serde_json::json;

use caseflow_dto::{ArrayMergeOption, CaseEvent, EditScope, StepPatch, StepState};
use caseflow_engine::{CaseEngine, EngineError};
use caseflow_flow::FlowError;
use caseflow_hook::FlowEventDispatcher;
use caseflow_plugin::PluginRegistry;
use caseflow_storage::{ContextStore, MemoryContextStore};

fn engine_with_store() -> (CaseEngine, Arc<MemoryContextStore>) {
    let store = Arc::new(MemoryContextStore::new());
    let engine = CaseEngine::new(
        store.clone(),
        Arc::new(PluginRegistry::new()),
        Arc::new(FlowEventDispatcher::noop()),
    );
    (engine, store)
}

#[tokio::test]
async fn test_bulk_edit_end_to_end() {
    let (engine, _store) = engine_with_store();

    engine
        .create_case("case-1", json!({
            "collectionFlow": {
                "state": {
                    "status": "pending",
                    "steps": [
                        { "stepName": "company_details", "state": "idle", "isCompleted": false }
                    ]
                }
            }
        }))
        .await
        .unwrap();

    let context = engine
        .apply(
            "case-1",
            CaseEvent::BeginEdit {
                scope: EditScope::Steps(vec!["company_details".to_string()]),
            },
        )
        .await
        .unwrap();

    let state = &context["collectionFlow"]["state"];
    assert_eq!(state["status"], "edit");
    assert_eq!(state["steps"][0]["state"], "edit");
    assert_eq!(state["steps"][0]["isCompleted"], false);
}

#[tokio::test]
async fn test_deep_merge_event_by_id() {
    let (engine, _store) = engine_with_store();

    engine
        .create_case(
            "case-1",
            json!({ "documents": [{ "id": "d1", "status": "uploaded" }] }),
        )
        .await
        .unwrap();

    let context = engine
        .apply(
            "case-1",
            CaseEvent::DeepMergeContext {
                new_context: json!({
                    "documents": [
                        { "id": "d1", "status": "verified" },
                        { "id": "d2", "status": "uploaded" }
                    ]
                }),
                array_merge_option: ArrayMergeOption::ById,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        context["documents"],
        json!([
            { "id": "d1", "status": "verified" },
            { "id": "d2", "status": "uploaded" }
        ])
    );
}

#[tokio::test]
async fn test_failed_transition_leaves_context_untouched() {
    let (engine, store) = engine_with_store();

    engine
        .create_case_with_flow("case-1", json!({ "entity": { "id": "e1" } }), ["s1"])
        .await
        .unwrap();
    let before = store.load("case-1").await.unwrap();

    let result = engine
        .apply(
            "case-1",
            CaseEvent::SetStepState {
                step_name: "ghost".to_string(),
                state: StepState::Completed,
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(EngineError::Flow(FlowError::StepNotFound(_)))
    ));

    // 转移失败：库里的 context 与版本都原封不动
    let after = store.load("case-1").await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_complete_step_refreshes_derived_fields() {
    let (engine, _store) = engine_with_store();

    engine
        .create_case_with_flow("case-1", json!({}), ["s1", "s2"])
        .await
        .unwrap();

    let context = engine
        .apply(
            "case-1",
            CaseEvent::CompleteStep {
                step_name: "s1".to_string(),
            },
        )
        .await
        .unwrap();

    let state = &context["collectionFlow"]["state"];
    assert_eq!(state["steps"][0]["state"], "completed");
    assert_eq!(state["steps"][0]["isCompleted"], true);
    assert_eq!(state["currentStep"], "s2");

    let context = engine
        .apply(
            "case-1",
            CaseEvent::CompleteStep {
                step_name: "s2".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(context["collectionFlow"]["state"]["status"], "completed");
}

#[tokio::test]
async fn test_update_context_replaces_wholesale() {
    let (engine, _store) = engine_with_store();

    engine
        .create_case("case-1", json!({ "old": true }))
        .await
        .unwrap();

    let context = engine
        .apply(
            "case-1",
            CaseEvent::UpdateContext {
                context: json!({ "fresh": 1 }),
            },
        )
        .await
        .unwrap();

    assert_eq!(context, json!({ "fresh": 1 }));
}

#[tokio::test]
async fn test_update_step_event_applies_patch() {
    let (engine, _store) = engine_with_store();

    engine
        .create_case_with_flow("case-1", json!({}), ["s1"])
        .await
        .unwrap();

    let context = engine
        .apply(
            "case-1",
            CaseEvent::UpdateStep {
                step_name: "s1".to_string(),
                patch: StepPatch {
                    state: Some(StepState::Revision),
                    reason: Some("document expired".to_string()),
                    is_completed: None,
                },
            },
        )
        .await
        .unwrap();

    let step = &context["collectionFlow"]["state"]["steps"][0];
    assert_eq!(step["state"], "revision");
    assert_eq!(step["reason"], "document expired");
}
