//! 采集流程状态机错误
//!
//! 这里的错误都代表 context 结构被破坏（流程状态缺失、步骤不存在），
//! 属于编程/数据完整性问题，必须中断调用方操作，不做静默降级。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("collection flow state not found")]
    StateNotFound,

    #[error("collection flow step not found: {0}")]
    StepNotFound(String),

    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Context(#[from] caseflow_context::ContextError),
}

/// crate 统一 Result 别名
pub type Result<T> = std::result::Result<T, FlowError>;
