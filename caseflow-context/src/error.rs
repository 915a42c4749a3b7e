//! context 层统一错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("empty context path")]
    EmptyPath,

    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// crate 统一 Result 别名
pub type Result<T> = std::result::Result<T, ContextError>;
