use serde_json::Value;

use caseflow_dto::{ArrayMergeOption, MergeOperation};

/// 策略感知的深合并：`current` 不被修改，返回合并后的克隆。
///
/// * 对象按 key 递归合并，新 key 追加，旧 key 被同名新值覆盖/下钻
/// * 标量直接覆盖
/// * 数组按 `ArrayMergeOption` 处理（整体替换 / 按 `id` upsert）
///
/// 同一操作合并两次与合并一次结果相同（两种策略均幂等）。
pub fn deep_merge_with_options(
    current: &Value,
    new_context: &Value,
    array_merge_option: ArrayMergeOption,
) -> Value {
    // 1️⃣ 先克隆，后续全部作用在克隆上
    let mut merged = current.clone();
    merge_into(&mut merged, new_context, array_merge_option);
    merged
}

/// [`MergeOperation`] 形式的入口，语义同 [`deep_merge_with_options`]
pub fn merge(current: &Value, operation: &MergeOperation) -> Value {
    deep_merge_with_options(
        current,
        &operation.new_context,
        operation.array_merge_option,
    )
}

fn merge_into(target: &mut Value, incoming: &Value, option: ArrayMergeOption) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, incoming_value) in incoming_map {
                match target_map.get_mut(key) {
                    Some(existing) => {
                        if existing.is_object() && incoming_value.is_object() {
                            merge_into(existing, incoming_value, option);
                        } else if let (Value::Array(old_items), Value::Array(new_items)) =
                            (&*existing, incoming_value)
                        {
                            let merged = merge_arrays(old_items, new_items, option);
                            *existing = Value::Array(merged);
                        } else {
                            *existing = incoming_value.clone();
                        }
                    }
                    None => {
                        target_map.insert(key.clone(), incoming_value.clone());
                    }
                }
            }
        }
        // 顶层不是两个对象：整体覆盖
        (target, incoming) => *target = incoming.clone(),
    }
}

fn merge_arrays(existing: &[Value], incoming: &[Value], option: ArrayMergeOption) -> Vec<Value> {
    match option {
        ArrayMergeOption::Replace => incoming.to_vec(),
        ArrayMergeOption::ById => {
            let mut result = existing.to_vec();
            for item in incoming {
                match item.get("id") {
                    Some(id) => {
                        let slot = result
                            .iter_mut()
                            .find(|candidate| candidate.get("id") == Some(id));
                        match slot {
                            // 命中既有元素：字段浅合并，保持原位置
                            Some(existing_item) => shallow_merge_element(existing_item, item),
                            None => result.push(item.clone()),
                        }
                    }
                    // 无 id 的元素：只在尚未存在时追加，保证重复合并不膨胀
                    None => {
                        if !result.contains(item) {
                            result.push(item.clone());
                        }
                    }
                }
            }
            result
        }
    }
}

fn shallow_merge_element(existing: &mut Value, incoming: &Value) {
    match (existing.as_object_mut(), incoming.as_object()) {
        (Some(existing_map), Some(incoming_map)) => {
            for (key, value) in incoming_map {
                existing_map.insert(key.clone(), value.clone());
            }
        }
        _ => *existing = incoming.clone(),
    }
}
