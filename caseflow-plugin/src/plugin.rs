use serde_json::Value;

use caseflow_dto::{ActionResult, CommonParams, RunOnBinding};

/// 插件统一契约
///
/// `invoke` 永远返回动作值；实现内部的任何失败都必须折叠为
/// `ActionResult::Error`，不允许向编排方冒泡 —— 这是多个插件能够
/// 互不拖累并发执行的前提。
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
    /// 插件名（注册表键，也写进成功动作）
    fn name(&self) -> &str;

    /// 触发绑定声明
    fn run_on(&self) -> &[RunOnBinding];

    fn common_params(&self) -> &CommonParams;

    /// 成功数据折叠回 context 的挂载路径；`None` 表示结果只返回不落 context
    fn output_path(&self) -> Option<&str> {
        None
    }

    async fn invoke(&self, context: &Value) -> ActionResult;
}
