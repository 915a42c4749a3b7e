use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ "__type": "path", "value": "<dot.path>" }` 叶子节点的判别标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPropertyTag {
    Path,
}

/// 指向 context 内某个 dot-path 的引用叶子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathProperty {
    #[serde(rename = "__type")]
    pub tag: PathPropertyTag,
    pub value: String,
}

/// 插件 payload 描述树
///
/// 叶子要么是字面量，要么是 `{"__type":"path","value":…}` 形式的 context
/// 引用；内部节点是镜像目标 payload 形状的对象/数组。构造后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginPayloadProperty {
    Path(PathProperty),
    Object(BTreeMap<String, PluginPayloadProperty>),
    Array(Vec<PluginPayloadProperty>),
    Literal(Value),
}

impl PluginPayloadProperty {
    /// 构造一个 path 引用叶子
    pub fn path(value: impl Into<String>) -> Self {
        PluginPayloadProperty::Path(PathProperty {
            tag: PathPropertyTag::Path,
            value: value.into(),
        })
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        PluginPayloadProperty::Literal(value.into())
    }

    /// 对象节点按 key 递归深合并，`overlay` 的叶子优先。
    /// 只在插件构造期用于叠加调用方覆盖项。
    pub fn merged_with(self, overlay: PluginPayloadProperty) -> PluginPayloadProperty {
        match (self, overlay) {
            (PluginPayloadProperty::Object(mut base), PluginPayloadProperty::Object(over)) => {
                for (key, value) in over {
                    let merged = match base.remove(&key) {
                        Some(existing) => existing.merged_with(value),
                        None => value,
                    };
                    base.insert(key, merged);
                }
                PluginPayloadProperty::Object(base)
            }
            (_, overlay) => overlay,
        }
    }
}

/// 插件的触发绑定：事件类型 + 可选的触发元素 id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOnBinding {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
}

impl RunOnBinding {
    pub fn on(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            element_id: None,
        }
    }

    pub fn on_element(event_type: impl Into<String>, element_id: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            element_id: Some(element_id.into()),
        }
    }

    /// 绑定未指定 element 时匹配该事件下的任意元素
    pub fn matches(&self, event_type: &str, element_id: Option<&str>) -> bool {
        if self.event_type != event_type {
            return false;
        }
        match (&self.element_id, element_id) {
            (None, _) => true,
            (Some(bound), Some(actual)) => bound == actual,
            (Some(_), None) => false,
        }
    }
}

/// 插件通用参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonParams {
    /// 防抖窗口，毫秒；0 或缺省表示不防抖
    #[serde(default)]
    pub debounce_time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_property_wire_format() {
        let prop = PluginPayloadProperty::path("entity.data.country");
        let ser = serde_json::to_value(&prop).unwrap();
        assert_eq!(
            ser,
            json!({ "__type": "path", "value": "entity.data.country" })
        );
    }

    #[test]
    fn test_untagged_path_wins_over_object() {
        // `__type: path` 形状的对象必须解析为引用叶子，而不是普通对象节点
        let prop: PluginPayloadProperty =
            serde_json::from_value(json!({ "__type": "path", "value": "a.b" })).unwrap();
        assert_eq!(prop, PluginPayloadProperty::path("a.b"));

        let prop: PluginPayloadProperty =
            serde_json::from_value(json!({ "vendor": "experian" })).unwrap();
        match prop {
            PluginPayloadProperty::Object(map) => {
                assert_eq!(
                    map.get("vendor"),
                    Some(&PluginPayloadProperty::Literal(json!("experian")))
                );
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_merged_with_overlay_wins_on_leaves() {
        let base: PluginPayloadProperty = serde_json::from_value(json!({
            "vendor": "experian",
            "address": { "city": { "__type": "path", "value": "entity.data.address.city" } }
        }))
        .unwrap();
        let overlay: PluginPayloadProperty = serde_json::from_value(json!({
            "vendor": "veriff",
            "address": { "postcode": { "__type": "path", "value": "entity.data.address.postcode" } }
        }))
        .unwrap();

        let merged = base.merged_with(overlay);
        let ser = serde_json::to_value(&merged).unwrap();
        assert_eq!(ser["vendor"], "veriff");
        assert_eq!(ser["address"]["city"]["__type"], "path");
        assert_eq!(ser["address"]["postcode"]["value"], "entity.data.address.postcode");
    }

    #[test]
    fn test_run_on_binding_matching() {
        let bound = RunOnBinding::on_element("onChange", "company-name");
        assert!(bound.matches("onChange", Some("company-name")));
        assert!(!bound.matches("onChange", Some("other")));
        assert!(!bound.matches("onChange", None));
        assert!(!bound.matches("onSubmit", Some("company-name")));

        let any_element = RunOnBinding::on("onSubmit");
        assert!(any_element.matches("onSubmit", None));
        assert!(any_element.matches("onSubmit", Some("whatever")));
    }
}
