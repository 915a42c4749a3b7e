use serde_json::{Map, Value};

use caseflow_context::get_path;
use caseflow_dto::PluginPayloadProperty;

/// 把 payload 描述树展开成具体 payload
///
/// * 字面量原样拷贝
/// * path 引用经 dot-path 解析到 context；未命中视为 undefined ——
///   对象键直接省略（可选字段留给 schema 判定），数组元素以 null 占位
pub fn resolve_payload_properties(properties: &PluginPayloadProperty, context: &Value) -> Value {
    resolve(properties, context).unwrap_or(Value::Null)
}

fn resolve(properties: &PluginPayloadProperty, context: &Value) -> Option<Value> {
    match properties {
        PluginPayloadProperty::Path(path) => get_path(context, &path.value).cloned(),
        PluginPayloadProperty::Object(properties) => {
            let mut resolved = Map::new();
            for (key, property) in properties {
                if let Some(value) = resolve(property, context) {
                    resolved.insert(key.clone(), value);
                }
            }
            Some(Value::Object(resolved))
        }
        PluginPayloadProperty::Array(items) => Some(Value::Array(
            items
                .iter()
                .map(|item| resolve(item, context).unwrap_or(Value::Null))
                .collect(),
        )),
        PluginPayloadProperty::Literal(value) => Some(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_path_leaf_against_context() {
        let properties: PluginPayloadProperty = serde_json::from_value(json!({
            "a": { "__type": "path", "value": "entity.data.country" }
        }))
        .unwrap();
        let context = json!({ "entity": { "data": { "country": "GB" } } });

        assert_eq!(
            resolve_payload_properties(&properties, &context),
            json!({ "a": "GB" })
        );
    }

    #[test]
    fn test_literals_copied_as_is() {
        let properties: PluginPayloadProperty = serde_json::from_value(json!({
            "vendor": "experian",
            "retries": 3,
            "nested": { "flag": true }
        }))
        .unwrap();

        assert_eq!(
            resolve_payload_properties(&properties, &json!({})),
            json!({ "vendor": "experian", "retries": 3, "nested": { "flag": true } })
        );
    }

    #[test]
    fn test_missing_path_omits_object_key() {
        let properties: PluginPayloadProperty = serde_json::from_value(json!({
            "present": { "__type": "path", "value": "entity.name" },
            "absent": { "__type": "path", "value": "entity.missing" }
        }))
        .unwrap();
        let context = json!({ "entity": { "name": "Acme" } });

        let resolved = resolve_payload_properties(&properties, &context);
        assert_eq!(resolved, json!({ "present": "Acme" }));
        assert!(resolved.get("absent").is_none());
    }

    #[test]
    fn test_array_items_resolve_positionally() {
        let properties: PluginPayloadProperty = serde_json::from_value(json!({
            "parties": [
                { "__type": "path", "value": "entity.name" },
                { "__type": "path", "value": "entity.missing" },
                "fixed"
            ]
        }))
        .unwrap();
        let context = json!({ "entity": { "name": "Acme" } });

        assert_eq!(
            resolve_payload_properties(&properties, &context),
            json!({ "parties": ["Acme", null, "fixed"] })
        );
    }

    #[test]
    fn test_path_resolves_whole_subtree() {
        let properties = PluginPayloadProperty::path("entity.data.address");
        let context = json!({
            "entity": { "data": { "address": { "city": "London", "postcode": "N1" } } }
        });

        assert_eq!(
            resolve_payload_properties(&properties, &context),
            json!({ "city": "London", "postcode": "N1" })
        );
    }
}
