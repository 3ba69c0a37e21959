use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 审计动作
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub enum AuditAction {
    #[default]
    Created, // 创建
    Updated,  // 更新
    Deleted,  // 删除
    Restored, // 恢复
}

impl<'de> Deserialize<'de> for AuditAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "created" => Ok(AuditAction::Created),
            "updated" => Ok(AuditAction::Updated),
            "deleted" => Ok(AuditAction::Deleted),
            "restored" => Ok(AuditAction::Restored),
            _ => Err(serde::de::Error::custom(format!(
                "无效的审计动作: '{s}'. 支持的动作: created, updated, deleted, restored"
            ))),
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Created => write!(f, "created"),
            AuditAction::Updated => write!(f, "updated"),
            AuditAction::Deleted => write!(f, "deleted"),
            AuditAction::Restored => write!(f, "restored"),
        }
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(AuditAction::Created),
            "updated" => Ok(AuditAction::Updated),
            "deleted" => Ok(AuditAction::Deleted),
            "restored" => Ok(AuditAction::Restored),
            _ => Err(format!("Invalid audit action: {s}")),
        }
    }
}

// 被追踪的实体类型
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub enum AuditEntityType {
    Employee,
    Enrollment,
    Grade,
    #[default]
    Student,
    StudentNote,
}

impl std::fmt::Display for AuditEntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEntityType::Employee => write!(f, "employee"),
            AuditEntityType::Enrollment => write!(f, "enrollment"),
            AuditEntityType::Grade => write!(f, "grade"),
            AuditEntityType::Student => write!(f, "student"),
            AuditEntityType::StudentNote => write!(f, "student_note"),
        }
    }
}

impl std::str::FromStr for AuditEntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(AuditEntityType::Employee),
            "enrollment" => Ok(AuditEntityType::Enrollment),
            "grade" => Ok(AuditEntityType::Grade),
            "student" => Ok(AuditEntityType::Student),
            "student_note" => Ok(AuditEntityType::StudentNote),
            _ => Err(format!("Invalid audit entity type: {s}")),
        }
    }
}

// 审计日志实体
//
// 只追加：每次被观察到的变更生成一条，系统自身永不更新或删除。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct AuditLog {
    pub id: i64,
    // 操作者，系统触发的变更为 None
    pub user_id: Option<i64>,
    pub entity_type: AuditEntityType,
    pub entity_id: i64,
    pub subject_label: String,
    pub action: AuditAction,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
