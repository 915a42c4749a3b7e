use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 插件执行结论的状态标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "CANCELED")]
    Canceled,
}

/// 插件成功动作：`{ name, status, ...responseData }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessAction {
    pub name: String,
    pub status: ProcessStatus,

    /// 外部服务返回的已校验数据，平铺进动作对象
    #[serde(flatten)]
    pub data: Value,
}

/// 插件失败动作：只携带诊断信息，不泄露状态码结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorAction {
    pub message: String,
}

/// 插件一次调用的结论。永远作为值返回，从不作为异常抛出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionResult {
    Success(SuccessAction),
    Error(ErrorAction),
}

impl ActionResult {
    pub fn success(name: impl Into<String>, data: Value) -> Self {
        ActionResult::Success(SuccessAction {
            name: name.into(),
            status: ProcessStatus::Success,
            data,
        })
    }

    /// 短路/跳过调用时的无操作成功
    pub fn canceled(name: impl Into<String>) -> Self {
        ActionResult::Success(SuccessAction {
            name: name.into(),
            status: ProcessStatus::Canceled,
            data: Value::Object(Default::default()),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        ActionResult::Error(ErrorAction {
            message: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ActionResult::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_action_flattens_data() {
        let action = ActionResult::success("companyCheck", json!({ "score": 42 }));
        let ser = serde_json::to_value(&action).unwrap();
        assert_eq!(
            ser,
            json!({
                "name": "companyCheck",
                "status": "SUCCESS",
                "score": 42
            })
        );
    }

    #[test]
    fn test_error_action_shape() {
        let action = ActionResult::error("boom");
        let ser = serde_json::to_value(&action).unwrap();
        assert_eq!(ser, json!({ "message": "boom" }));
        assert!(action.is_error());
    }

    #[test]
    fn test_canceled_status_marker() {
        let action = ActionResult::canceled("companyCheck");
        let ser = serde_json::to_value(&action).unwrap();
        assert_eq!(ser["status"], "CANCELED");
        assert!(action.is_success());
    }
}
