use thiserror::Error;

/// 编排层错误
///
/// 状态机错误（流程状态缺失、步骤不存在）原样向上传播并中断本次
/// 事件；插件失败不会出现在这里 —— 它们是 `ActionResult::Error` 值。
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] caseflow_storage::StorageError),

    #[error(transparent)]
    Flow(#[from] caseflow_flow::FlowError),

    #[error(transparent)]
    Context(#[from] caseflow_context::ContextError),

    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// crate 统一 Result 别名
pub type Result<T> = std::result::Result<T, EngineError>;
