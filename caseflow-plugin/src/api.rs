//! 通用 API 插件 —— 外部校验服务调用的完整生命周期
//!
//! 具体插件（身份核验、征信、银行账户校验）只是本契约的一份配置：
//! payload 描述树 + 请求/响应 schema + 输出挂载路径。

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use caseflow_context::get_path;
use caseflow_dto::{ActionResult, CommonParams, PluginPayloadProperty, RunOnBinding};

use crate::config::{ApiPluginEnv, HttpConfig};
use crate::error::{PluginError, Result};
use crate::payload::resolve_payload_properties;
use crate::plugin::Plugin;
use crate::schema::SchemaValidator;

/// 业务短路规则：已校验 payload 的某个字段等于给定值时跳过调用，
/// 返回 CANCELED 的无操作成功。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipRule {
    pub path: String,
    pub equals: Value,
}

impl SkipRule {
    pub fn matches(&self, payload: &Value) -> bool {
        get_path(payload, &self.path) == Some(&self.equals)
    }
}

/// API 插件装配参数
pub struct ApiPluginParams {
    pub name: String,
    pub method: Method,
    /// 拼在 base URL 之后的服务路径，如 `/bank-account-verification`
    pub path: String,
    pub headers: HashMap<String, String>,
    pub payload: PluginPayloadProperty,
    pub payload_schema: Value,
    pub response_schema: Value,
    pub output_path: Option<String>,
    pub run_on: Vec<RunOnBinding>,
    pub common_params: CommonParams,
    pub skip_rule: Option<SkipRule>,
    /// `None` 时在每次 invoke 里按环境变量解析
    pub env: Option<ApiPluginEnv>,
    pub http: HttpConfig,
}

impl Default for ApiPluginParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            method: Method::POST,
            path: String::new(),
            headers: HashMap::new(),
            payload: PluginPayloadProperty::Object(Default::default()),
            payload_schema: Value::Bool(true),
            response_schema: Value::Bool(true),
            output_path: None,
            run_on: Vec::new(),
            common_params: CommonParams::default(),
            skip_rule: None,
            env: None,
            http: HttpConfig::default(),
        }
    }
}

pub struct ApiPlugin {
    name: String,
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    payload: PluginPayloadProperty,
    payload_schema: SchemaValidator,
    response_schema: SchemaValidator,
    output_path: Option<String>,
    run_on: Vec<RunOnBinding>,
    common_params: CommonParams,
    skip_rule: Option<SkipRule>,
    env: Option<ApiPluginEnv>,
    client: Client,
}

impl ApiPlugin {
    /// schema 编译和 HTTP 客户端构建都在装配期完成并立即失败
    pub fn new(params: ApiPluginParams) -> Result<Self> {
        let payload_schema = SchemaValidator::new(&params.payload_schema)?;
        let response_schema = SchemaValidator::new(&params.response_schema)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(params.http.timeout.unwrap_or(30)))
            .build()
            .map_err(|error| PluginError::Configuration(error.to_string()))?;

        let mut headers = params.headers;
        if let Some(extra) = params.http.headers {
            for (key, value) in extra {
                headers.entry(key).or_insert(value);
            }
        }

        Ok(Self {
            name: params.name,
            method: params.method,
            path: params.path,
            headers,
            payload: params.payload,
            payload_schema,
            response_schema,
            output_path: params.output_path,
            run_on: params.run_on,
            common_params: params.common_params,
            skip_rule: params.skip_rule,
            env: params.env,
            client,
        })
    }

    fn resolve_env(&self) -> std::result::Result<ApiPluginEnv, String> {
        match &self.env {
            Some(env) => Ok(env.clone()),
            None => ApiPluginEnv::from_env().map_err(|error| error.to_string()),
        }
    }

    async fn try_invoke(&self, context: &Value) -> std::result::Result<ActionResult, String> {
        // 1️⃣ 配置解析：缺失即终止，不碰网络
        let env = self.resolve_env()?;
        let url = format!("{}{}", env.api_url, self.path);

        // 2️⃣ 展开并校验 payload；不合法就不发请求
        let payload = resolve_payload_properties(&self.payload, context);
        if let Err(diagnostics) = self.payload_schema.validate(&payload) {
            return Ok(ActionResult::error(format!(
                "{} - Invalid payload: {}",
                self.name, diagnostics
            )));
        }

        // 3️⃣ 业务短路：对已校验 payload 评估
        if let Some(rule) = &self.skip_rule {
            if rule.matches(&payload) {
                debug!(plugin = %self.name, "skip rule matched, reporting canceled");
                return Ok(ActionResult::canceled(&self.name));
            }
        }

        debug!(plugin = %self.name, %url, method = %self.method, "sending API request");

        // 4️⃣ 发起调用（bearer 凭证随请求头注入）
        let mut request = self.client.request(self.method.clone(), &url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        request = request.bearer_auth(&env.api_token);
        if self.method != Method::GET {
            request = request.json(&payload);
        }

        let response = request
            .send()
            .await
            .map_err(|error| format!("request failed: {}", error))?;

        // 5️⃣ 空响应体检查：content-length 存在且为 0 才算违例
        if let Some(length) = response.headers().get(CONTENT_LENGTH) {
            let is_empty = length
                .to_str()
                .ok()
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                == Some(0);
            if is_empty {
                return Err("received an empty response".to_string());
            }
        }

        // 6️⃣ 非成功状态：连同响应体一起报出去
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(ActionResult::error(format!(
                "{} - Request Failed: {} Error: {}",
                self.name, status, body
            )));
        }

        // 7️⃣ 解析并校验响应
        let body: Value = response
            .json()
            .await
            .map_err(|error| format!("invalid JSON response: {}", error))?;
        if let Err(diagnostics) = self.response_schema.validate(&body) {
            return Ok(ActionResult::error(format!(
                "{} - Invalid response: {}",
                self.name, diagnostics
            )));
        }

        // 8️⃣ 成功动作携带已校验数据；折叠回 context 由编排层完成
        Ok(ActionResult::success(&self.name, body))
    }
}

#[async_trait::async_trait]
impl Plugin for ApiPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn run_on(&self) -> &[RunOnBinding] {
        &self.run_on
    }

    fn common_params(&self) -> &CommonParams {
        &self.common_params
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    /// 生命周期内任何错误都折叠为 `ActionResult::Error`，绝不冒泡
    async fn invoke(&self, context: &Value) -> ActionResult {
        match self.try_invoke(context).await {
            Ok(result) => result,
            Err(message) => {
                warn!(plugin = %self.name, error = %message, "plugin invocation failed");
                ActionResult::error(format!("{} - {}", self.name, message))
            }
        }
    }
}
