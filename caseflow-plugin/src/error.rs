use thiserror::Error;

/// 插件装配层错误（注册、配置、schema 编译）
///
/// 注意：一次 `invoke` 内部的失败不会走这里 —— 它们以
/// `ActionResult::Error` 的形式作为值返回给编排方。
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin not found: {0}")]
    NotFound(String),

    #[error("plugin already registered: {0}")]
    AlreadyRegistered(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid schema: {0}")]
    Schema(String),
}

/// crate 统一 Result 别名
pub type Result<T> = std::result::Result<T, PluginError>;
