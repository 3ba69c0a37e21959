//! 按实体类型声明的审计字段策略
//!
//! 纯配置数据：实体类型 → 允许/排除的字段集合，不做虚分发。

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::audit::entities::AuditEntityType;

/// 字段策略模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    /// 白名单：仅快照列出的字段
    Allow,
    /// 黑名单：快照除列出字段外的全部属性
    Deny,
}

/// 某实体类型的字段策略
#[derive(Debug, Clone)]
pub struct FieldPolicy {
    pub mode: PolicyMode,
    pub fields: &'static [&'static str],
}

impl FieldPolicy {
    /// 判断某字段是否进入审计快照
    pub fn tracks(&self, field: &str) -> bool {
        match self.mode {
            PolicyMode::Allow => self.fields.contains(&field),
            PolicyMode::Deny => !self.fields.contains(&field),
        }
    }
}

static FIELD_POLICIES: Lazy<HashMap<AuditEntityType, FieldPolicy>> = Lazy::new(|| {
    let mut policies = HashMap::new();
    // 学生/教职工：除照片与时间戳外全部追踪
    policies.insert(
        AuditEntityType::Student,
        FieldPolicy {
            mode: PolicyMode::Deny,
            fields: &["photo", "created_at", "updated_at", "deleted_at"],
        },
    );
    policies.insert(
        AuditEntityType::Employee,
        FieldPolicy {
            mode: PolicyMode::Deny,
            fields: &["photo", "created_at", "updated_at", "deleted_at"],
        },
    );
    // 成绩：每个评分字段都有意义，仅排除时间戳
    policies.insert(
        AuditEntityType::Grade,
        FieldPolicy {
            mode: PolicyMode::Deny,
            fields: &["graded_at", "updated_at"],
        },
    );
    // 选课记录：白名单，聚合服务写入的派生字段不算"意图"变更
    policies.insert(
        AuditEntityType::Enrollment,
        FieldPolicy {
            mode: PolicyMode::Allow,
            fields: &["student_id", "class_id", "cohort_id", "status"],
        },
    );
    policies.insert(
        AuditEntityType::StudentNote,
        FieldPolicy {
            mode: PolicyMode::Allow,
            fields: &["body", "visibility"],
        },
    );
    policies
});

/// 查询某实体类型的字段策略
pub fn policy_for(entity_type: AuditEntityType) -> &'static FieldPolicy {
    // 表中覆盖全部被追踪类型，缺失视为编程错误
    &FIELD_POLICIES[&entity_type]
}
