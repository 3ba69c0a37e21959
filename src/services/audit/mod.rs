//! 变更审计服务
//!
//! 观察被追踪实体的生命周期事件（created / updated / deleted / restored），
//! 为每次变更构建一条不可变审计记录。本模块只做纯计算——由持久化变更
//! 边界显式传入变更前后的快照，审计行的落库由 Storage 层完成，与成绩
//! 语义完全解耦。
//!
//! 每个实体实例的状态机：
//! `created → [updated]* → (deleted | restored → [updated]* → deleted)`
//! 其中 updated 在过滤后差异为空时不产生记录（抑制，而非空事件）。

pub mod diff;
pub mod policy;

use serde::Serialize;
use serde_json::Value;

use crate::errors::Result;
use crate::models::audit::entities::{AuditAction, AuditEntityType};

/// 待落库的审计记录（尚未分配 id 与时间戳）
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub user_id: Option<i64>,
    pub entity_type: AuditEntityType,
    pub entity_id: i64,
    pub subject_label: String,
    pub action: AuditAction,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
}

/// 构建 created 记录：只捕获过滤后的新值
pub fn record_created<T: Serialize>(
    user_id: Option<i64>,
    entity_type: AuditEntityType,
    entity_id: i64,
    subject_label: String,
    new: &T,
) -> Result<AuditRecord> {
    let snapshot = diff::snapshot(new)?;
    let tracked = diff::filter_tracked(&snapshot, policy::policy_for(entity_type));

    Ok(AuditRecord {
        user_id,
        entity_type,
        entity_id,
        subject_label,
        action: AuditAction::Created,
        old_values: None,
        new_values: Some(Value::Object(tracked)),
    })
}

/// 构建 updated 记录
///
/// 只包含实际变化的被追踪字段；差异为空时返回 None，不产生事件。
pub fn record_updated<T: Serialize>(
    user_id: Option<i64>,
    entity_type: AuditEntityType,
    entity_id: i64,
    subject_label: String,
    old: &T,
    new: &T,
) -> Result<Option<AuditRecord>> {
    let old_snapshot = diff::snapshot(old)?;
    let new_snapshot = diff::snapshot(new)?;
    let (old_values, new_values) = diff::changed_fields(
        &old_snapshot,
        &new_snapshot,
        policy::policy_for(entity_type),
    );

    if new_values.is_empty() {
        return Ok(None);
    }

    Ok(Some(AuditRecord {
        user_id,
        entity_type,
        entity_id,
        subject_label,
        action: AuditAction::Updated,
        old_values: Some(Value::Object(old_values)),
        new_values: Some(Value::Object(new_values)),
    }))
}

/// 构建 deleted 记录：只捕获过滤后的旧值
pub fn record_deleted<T: Serialize>(
    user_id: Option<i64>,
    entity_type: AuditEntityType,
    entity_id: i64,
    subject_label: String,
    old: &T,
) -> Result<AuditRecord> {
    let snapshot = diff::snapshot(old)?;
    let tracked = diff::filter_tracked(&snapshot, policy::policy_for(entity_type));

    Ok(AuditRecord {
        user_id,
        entity_type,
        entity_id,
        subject_label,
        action: AuditAction::Deleted,
        old_values: Some(Value::Object(tracked)),
        new_values: None,
    })
}

/// 构建 restored 记录：不携带差异负载，只记录状态迁移本身
pub fn record_restored(
    user_id: Option<i64>,
    entity_type: AuditEntityType,
    entity_id: i64,
    subject_label: String,
) -> AuditRecord {
    AuditRecord {
        user_id,
        entity_type,
        entity_id,
        subject_label,
        action: AuditAction::Restored,
        old_values: None,
        new_values: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
    use serde_json::json;

    fn enrollment(status: EnrollmentStatus, weighted_average: Option<f64>) -> Enrollment {
        Enrollment {
            id: 7,
            student_id: 3,
            class_id: 11,
            cohort_id: None,
            status,
            weighted_average,
            final_letter_grade: None,
            grade_points: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_updated_captures_only_changed_tracked_fields() {
        let old = enrollment(EnrollmentStatus::Enrolled, Some(80.0));
        let new = enrollment(EnrollmentStatus::Withdrawn, Some(92.5));

        let record = record_updated(
            Some(1),
            AuditEntityType::Enrollment,
            old.id,
            old.subject_label(),
            &old,
            &new,
        )
        .unwrap()
        .unwrap();

        assert_eq!(record.action, AuditAction::Updated);
        assert_eq!(record.old_values, Some(json!({"status": "enrolled"})));
        assert_eq!(record.new_values, Some(json!({"status": "withdrawn"})));
    }

    #[test]
    fn test_derived_only_update_is_suppressed() {
        // 仅派生字段变化：不产生审计记录
        let old = enrollment(EnrollmentStatus::Enrolled, Some(80.0));
        let new = enrollment(EnrollmentStatus::Enrolled, Some(92.5));

        let record = record_updated(
            None,
            AuditEntityType::Enrollment,
            old.id,
            old.subject_label(),
            &old,
            &new,
        )
        .unwrap();

        assert!(record.is_none());
    }

    #[test]
    fn test_created_captures_new_only() {
        let new = enrollment(EnrollmentStatus::Enrolled, None);
        let record = record_created(
            Some(5),
            AuditEntityType::Enrollment,
            new.id,
            new.subject_label(),
            &new,
        )
        .unwrap();

        assert_eq!(record.action, AuditAction::Created);
        assert!(record.old_values.is_none());
        let values = record.new_values.unwrap();
        assert_eq!(values["status"], json!("enrolled"));
        // 白名单外的字段不入快照
        assert!(values.get("weighted_average").is_none());
    }

    #[test]
    fn test_deleted_captures_old_only() {
        let old = enrollment(EnrollmentStatus::Withdrawn, None);
        let record = record_deleted(
            None,
            AuditEntityType::Enrollment,
            old.id,
            old.subject_label(),
            &old,
        )
        .unwrap();

        assert_eq!(record.action, AuditAction::Deleted);
        assert!(record.new_values.is_none());
        assert_eq!(record.old_values.unwrap()["status"], json!("withdrawn"));
    }

    #[test]
    fn test_restored_has_no_payload() {
        let record = record_restored(None, AuditEntityType::Student, 9, "Wei Chen (S-9)".into());
        assert_eq!(record.action, AuditAction::Restored);
        assert!(record.old_values.is_none());
        assert!(record.new_values.is_none());
    }
}
