use serde_json::{Map, Value};

use crate::error::{ContextError, Result};

/// 按 dot-path 读取：`entity.data.country`
///
/// 路径段命中数组时按下标解析；任何一段缺失返回 `None`。
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = doc;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// 按 dot-path 写入，中间容器不存在时创建为对象；
/// 中间段不是对象时直接替换为对象（与上游 lodash `set` 行为一致）。
pub fn set_path(doc: &mut Value, path: &str, value: Value) -> Result<()> {
    if path.is_empty() {
        return Err(ContextError::EmptyPath);
    }

    let mut segments = path.split('.').collect::<Vec<_>>();
    let last = segments.pop().expect("split yields at least one segment");

    let mut current = doc;
    for segment in segments {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let map = current.as_object_mut().expect("just coerced to object");
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    current
        .as_object_mut()
        .expect("just coerced to object")
        .insert(last.to_string(), value);
    Ok(())
}
