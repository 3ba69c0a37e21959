//! 快照差异计算
//!
//! 以 (old_row, new_row, policy) 为输入的纯函数，不依赖任何存储状态。

use serde::Serialize;
use serde_json::{Map, Value};

use super::policy::FieldPolicy;
use crate::errors::{Result, SRSystemError};

/// 将业务模型序列化为字段快照
pub fn snapshot<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(SRSystemError::audit_record(format!(
            "审计快照要求对象类型，实际为: {other}"
        ))),
    }
}

/// 按字段策略过滤快照
pub fn filter_tracked(snapshot: &Map<String, Value>, policy: &FieldPolicy) -> Map<String, Value> {
    snapshot
        .iter()
        .filter(|(key, _)| policy.tracks(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// 计算更新前后实际变化的被追踪字段
///
/// 返回 (old_values, new_values)，只包含值确实发生变化的字段。
pub fn changed_fields(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    policy: &FieldPolicy,
) -> (Map<String, Value>, Map<String, Value>) {
    let mut old_out = Map::new();
    let mut new_out = Map::new();

    for (key, new_value) in new {
        if !policy.tracks(key) {
            continue;
        }
        let old_value = old.get(key).unwrap_or(&Value::Null);
        if old_value != new_value {
            old_out.insert(key.clone(), old_value.clone());
            new_out.insert(key.clone(), new_value.clone());
        }
    }

    (old_out, new_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audit::entities::AuditEntityType;
    use crate::services::audit::policy::policy_for;
    use serde_json::json;

    fn map_of(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_changed_fields_only_actual_changes() {
        let policy = policy_for(AuditEntityType::Enrollment);
        let old = map_of(json!({"status": "enrolled", "class_id": 1, "cohort_id": null}));
        let new = map_of(json!({"status": "withdrawn", "class_id": 1, "cohort_id": null}));

        let (old_out, new_out) = changed_fields(&old, &new, policy);
        assert_eq!(old_out.len(), 1);
        assert_eq!(old_out["status"], json!("enrolled"));
        assert_eq!(new_out["status"], json!("withdrawn"));
    }

    #[test]
    fn test_changed_fields_ignores_untracked() {
        // 派生字段变化不产生差异
        let policy = policy_for(AuditEntityType::Enrollment);
        let old = map_of(json!({"status": "enrolled", "weighted_average": 80.0}));
        let new = map_of(json!({"status": "enrolled", "weighted_average": 92.5}));

        let (old_out, new_out) = changed_fields(&old, &new, policy);
        assert!(old_out.is_empty());
        assert!(new_out.is_empty());
    }

    #[test]
    fn test_filter_tracked_deny_policy() {
        let policy = policy_for(AuditEntityType::Student);
        let snap = map_of(json!({
            "first_name": "Wei",
            "photo": "blob",
            "created_at": "2025-08-01T00:00:00Z"
        }));

        let filtered = filter_tracked(&snap, policy);
        assert!(filtered.contains_key("first_name"));
        assert!(!filtered.contains_key("photo"));
        assert!(!filtered.contains_key("created_at"));
    }

    #[test]
    fn test_snapshot_rejects_non_object() {
        let err = snapshot(&42i64).unwrap_err();
        assert_eq!(err.code(), "E008");
        assert_eq!(err.error_type(), "Audit Record Error");
    }
}
