use std::collections::HashMap;
use std::env;

use crate::error::{PluginError, Result};

pub const API_URL_VAR: &str = "CASEFLOW_UNIFIED_API_URL";
pub const API_TOKEN_VAR: &str = "CASEFLOW_UNIFIED_API_TOKEN";

/// 外部校验服务的接入配置（base URL + bearer 凭证）
///
/// 缺失属于部署错误：在发起任何网络调用之前就要报出来。
#[derive(Debug, Clone)]
pub struct ApiPluginEnv {
    pub api_url: String,
    pub api_token: String,
}

impl ApiPluginEnv {
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
        }
    }

    /// 从环境变量读取；任一变量缺失或为空都报配置错误
    pub fn from_env() -> Result<Self> {
        let api_url = require_var(API_URL_VAR)?;
        let api_token = require_var(API_TOKEN_VAR)?;
        Ok(Self { api_url, api_token })
    }
}

fn require_var(name: &'static str) -> Result<String> {
    let value = env::var(name)
        .map_err(|_| PluginError::Configuration(format!("missing required env: {}", name)))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(PluginError::Configuration(format!(
            "missing required env: {}",
            name
        )));
    }
    Ok(value)
}

/// 出站 HTTP 客户端配置
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// 超时秒数；超时与其他网络错误同等处理
    pub timeout: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(30),
            headers: None,
        }
    }
}
