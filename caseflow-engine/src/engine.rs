//! engine.rs —— case context 的唯一写入口
//!
//! 控制器、插件 runner 都通过这里改 context，不直接落库。
//! 每个 case 的写入经行锁 + 版本号串行化；状态机转移失败时
//! 不产生任何 context 写入（先转移、后合并的顺序保证）。

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use caseflow_context::{deep_merge_with_options, set_path};
use caseflow_dto::{
    ActionResult, ArrayMergeOption, CaseEvent, CollectionFlowStatus, FlowEvent, ProcessStatus,
    StepPatch, StepState, SuccessAction,
};
use caseflow_flow::{
    build_collection_flow_state, put_collection_flow_state, refresh_derived_state, set_step_state,
    set_steps_to_edit, update_step,
};
use caseflow_hook::FlowEventDispatcher;
use caseflow_plugin::{Plugin, PluginRegistry, PluginRunnerSet, ResultSink};
use caseflow_storage::ContextStore;

use crate::error::Result;

pub struct CaseEngine {
    store: Arc<dyn ContextStore>,
    registry: Arc<PluginRegistry>,
    hooks: Arc<FlowEventDispatcher>,
    /// 防抖状态跟着 runner 走，所以 runner 集合按 case 缓存复用
    runner_sets: Mutex<HashMap<String, Arc<PluginRunnerSet>>>,
}

impl CaseEngine {
    pub fn new(
        store: Arc<dyn ContextStore>,
        registry: Arc<PluginRegistry>,
        hooks: Arc<FlowEventDispatcher>,
    ) -> Self {
        Self {
            store,
            registry,
            hooks,
            runner_sets: Mutex::new(HashMap::new()),
        }
    }

    /// 新建 case
    pub async fn create_case(&self, case_id: &str, context: Value) -> Result<Value> {
        let record = self.store.create(case_id, context).await?;
        Ok(record.context)
    }

    /// 新建 case 并装上采集流程骨架（按给定顺序的步骤名）
    pub async fn create_case_with_flow<I, S>(
        &self,
        case_id: &str,
        mut context: Value,
        step_names: I,
    ) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let flow = build_collection_flow_state(step_names);
        put_collection_flow_state(&mut context, &flow)?;
        self.create_case(case_id, context).await
    }

    /// 单一事件入口：加锁 → 读 → 纯函数变换 → 带版本写回
    ///
    /// 变换阶段报错（状态机错误）直接传播，此时库里 context 原封不动。
    pub async fn apply(&self, case_id: &str, event: CaseEvent) -> Result<Value> {
        let lock = self.store.case_lock(case_id).await;
        let _guard = lock.lock().await;

        self.hooks
            .dispatch(FlowEvent::EventReceived {
                case_id: case_id.to_string(),
                event_type: event.event_type().to_string(),
            })
            .await;
        debug!(case_id, event_type = event.event_type(), "received case event");

        let record = self.store.load(case_id).await?;
        let next_context = Self::transform(&record.context, &event)?;

        let saved = self
            .store
            .save(case_id, next_context, record.revision)
            .await?;

        self.emit_post_save(case_id, &event).await;
        Ok(saved.context)
    }

    /// `(旧 context, 事件) -> 新 context` 的纯变换，不碰存储
    fn transform(current: &Value, event: &CaseEvent) -> Result<Value> {
        match event {
            CaseEvent::DeepMergeContext {
                new_context,
                array_merge_option,
            } => Ok(deep_merge_with_options(
                current,
                new_context,
                *array_merge_option,
            )),

            CaseEvent::UpdateContext { context } => Ok(context.clone()),

            CaseEvent::SetStepState { step_name, state } => {
                let mut next = current.clone();
                set_step_state(&mut next, step_name, *state)?;
                Ok(next)
            }

            CaseEvent::UpdateStep { step_name, patch } => {
                let mut next = current.clone();
                update_step(&mut next, step_name, patch)?;
                Ok(next)
            }

            CaseEvent::CompleteStep { step_name } => {
                let mut next = current.clone();
                update_step(
                    &mut next,
                    step_name,
                    &StepPatch {
                        state: Some(StepState::Completed),
                        reason: None,
                        is_completed: Some(true),
                    },
                )?;
                refresh_derived_state(&mut next)?;
                Ok(next)
            }

            CaseEvent::BeginEdit { scope } => Ok(set_steps_to_edit(current, scope)?),
        }
    }

    async fn emit_post_save(&self, case_id: &str, event: &CaseEvent) {
        match event {
            CaseEvent::DeepMergeContext {
                array_merge_option, ..
            } => {
                self.hooks
                    .dispatch(FlowEvent::ContextMerged {
                        case_id: case_id.to_string(),
                        array_merge_option: *array_merge_option,
                    })
                    .await;
            }
            CaseEvent::SetStepState { step_name, state } => {
                self.hooks
                    .dispatch(FlowEvent::StepTransitioned {
                        case_id: case_id.to_string(),
                        step_name: step_name.clone(),
                        state: *state,
                    })
                    .await;
            }
            CaseEvent::CompleteStep { step_name } => {
                self.hooks
                    .dispatch(FlowEvent::StepTransitioned {
                        case_id: case_id.to_string(),
                        step_name: step_name.clone(),
                        state: StepState::Completed,
                    })
                    .await;
            }
            CaseEvent::BeginEdit { .. } => {
                self.hooks
                    .dispatch(FlowEvent::StatusChanged {
                        case_id: case_id.to_string(),
                        status: CollectionFlowStatus::Edit,
                    })
                    .await;
            }
            CaseEvent::UpdateContext { .. } | CaseEvent::UpdateStep { .. } => {}
        }
    }

    /// 触发绑定到该事件的插件
    ///
    /// 立即执行的插件在返回值里给出各自独立的结论；防抖插件在窗口
    /// 安静后异步执行，结论经同一条折叠路径写回 context。单个插件
    /// 失败只产生 Error 值，不影响兄弟插件，也不中断本次触发。
    pub async fn trigger_plugins(
        &self,
        case_id: &str,
        event_type: &str,
        element_id: Option<&str>,
    ) -> Result<Vec<ActionResult>> {
        let runner_set = self.runner_set(case_id).await;
        let runners = runner_set.matching(event_type, element_id);
        if runners.is_empty() {
            return Ok(Vec::new());
        }

        let record = self.store.load(case_id).await?;

        let mut results = Vec::new();
        for runner in runners {
            if let Some(result) = runner.run(record.context.clone()).await {
                results.push(result);
            }
        }
        Ok(results)
    }

    async fn runner_set(&self, case_id: &str) -> Arc<PluginRunnerSet> {
        let mut sets = self.runner_sets.lock().await;
        sets.entry(case_id.to_string())
            .or_insert_with(|| {
                let sink = fold_sink(self.store.clone(), self.hooks.clone(), case_id.to_string());
                Arc::new(PluginRunnerSet::from_registry(&self.registry, sink))
            })
            .clone()
    }
}

/// 把插件结论折叠回 case context 的投递回调
fn fold_sink(
    store: Arc<dyn ContextStore>,
    hooks: Arc<FlowEventDispatcher>,
    case_id: String,
) -> ResultSink {
    Arc::new(move |plugin, result| {
        let store = store.clone();
        let hooks = hooks.clone();
        let case_id = case_id.clone();
        Box::pin(async move {
            fold_action_result(store, hooks, case_id, plugin, result).await;
        })
    })
}

async fn fold_action_result(
    store: Arc<dyn ContextStore>,
    hooks: Arc<FlowEventDispatcher>,
    case_id: String,
    plugin: Arc<dyn Plugin>,
    result: ActionResult,
) {
    match result {
        ActionResult::Success(action) => {
            if action.status == ProcessStatus::Success {
                if let Some(output_path) = plugin.output_path() {
                    if let Err(error) =
                        merge_success_at(&store, &case_id, output_path, &action).await
                    {
                        warn!(case_id = %case_id, plugin = plugin.name(), %error, "failed to fold plugin output");
                    }
                }
            }
            hooks
                .dispatch(FlowEvent::PluginSucceeded {
                    case_id,
                    plugin_name: plugin.name().to_string(),
                })
                .await;
        }
        ActionResult::Error(error) => {
            warn!(case_id = %case_id, plugin = plugin.name(), error = %error.message, "plugin reported failure");
            hooks
                .dispatch(FlowEvent::PluginFailed {
                    case_id,
                    plugin_name: plugin.name().to_string(),
                    message: error.message,
                })
                .await;
        }
    }
}

/// 插件输出对自己的挂载路径是权威的：按 REPLACE 语义经合并引擎写入
async fn merge_success_at(
    store: &Arc<dyn ContextStore>,
    case_id: &str,
    output_path: &str,
    action: &SuccessAction,
) -> Result<()> {
    let lock = store.case_lock(case_id).await;
    let _guard = lock.lock().await;

    let record = store.load(case_id).await?;

    let mut patch = Value::Object(Default::default());
    set_path(&mut patch, output_path, serde_json::to_value(action)?)?;
    let merged = deep_merge_with_options(&record.context, &patch, ArrayMergeOption::Replace);

    store.save(case_id, merged, record.revision).await?;
    Ok(())
}
