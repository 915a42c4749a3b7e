use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::{PluginError, Result};

/// 编译好的 JSON Schema 校验器
///
/// 校验失败不是异常：诊断串由调用方包进 `ActionResult::Error`。
pub struct SchemaValidator {
    compiled: JSONSchema,
}

impl SchemaValidator {
    /// schema 本身不合法属于装配期错误
    pub fn new(schema: &Value) -> Result<Self> {
        let compiled = JSONSchema::compile(schema)
            .map_err(|error| PluginError::Schema(error.to_string()))?;
        Ok(Self { compiled })
    }

    /// 任意实例都通过的校验器（schema `true`）
    pub fn permissive() -> Self {
        Self {
            compiled: JSONSchema::compile(&Value::Bool(true))
                .expect("trivial schema always compiles"),
        }
    }

    /// 返回 `Err(诊断串)` 而不是错误类型，方便直接拼接进动作消息
    pub fn validate(&self, instance: &Value) -> std::result::Result<(), String> {
        if let Err(errors) = self.compiled.validate(instance) {
            let diagnostics = errors
                .map(|error| format!("{} at {}", error, error.instance_path))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(diagnostics);
        }
        Ok(())
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "clientId": { "type": "string", "minLength": 1 },
                "vendor": { "enum": ["experian"] }
            },
            "required": ["clientId", "vendor"]
        })
    }

    #[test]
    fn test_valid_instance_passes() {
        let validator = SchemaValidator::new(&payload_schema()).unwrap();
        assert!(validator
            .validate(&json!({ "clientId": "c1", "vendor": "experian" }))
            .is_ok());
    }

    #[test]
    fn test_invalid_instance_yields_diagnostics() {
        let validator = SchemaValidator::new(&payload_schema()).unwrap();
        let diagnostics = validator
            .validate(&json!({ "vendor": "unknown" }))
            .unwrap_err();
        assert!(!diagnostics.is_empty());
        assert!(!validator.is_valid(&json!({})));
    }

    #[test]
    fn test_broken_schema_is_assembly_error() {
        let schema = json!({ "type": "not-a-real-type" });
        assert!(matches!(
            SchemaValidator::new(&schema),
            Err(PluginError::Schema(_))
        ));
    }

    #[test]
    fn test_permissive_accepts_anything() {
        let validator = SchemaValidator::permissive();
        assert!(validator.validate(&json!({ "anything": [1, 2, 3] })).is_ok());
        assert!(validator.validate(&json!(null)).is_ok());
    }
}
