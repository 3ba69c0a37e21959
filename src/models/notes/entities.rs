use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 备注可见范围
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub enum NoteVisibility {
    #[default]
    Staff, // 全体教职工可见
    AdminOnly, // 仅管理员可见
}

impl std::fmt::Display for NoteVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteVisibility::Staff => write!(f, "staff"),
            NoteVisibility::AdminOnly => write!(f, "admin_only"),
        }
    }
}

impl std::str::FromStr for NoteVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staff" => Ok(NoteVisibility::Staff),
            "admin_only" => Ok(NoteVisibility::AdminOnly),
            _ => Err(format!("Invalid note visibility: {s}")),
        }
    }
}

// 学生备注实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct StudentNote {
    pub id: i64,
    pub student_id: i64,
    pub author_id: Option<i64>,
    pub body: String,
    pub visibility: NoteVisibility,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl StudentNote {
    /// 审计日志中的主体标签
    pub fn subject_label(&self) -> String {
        format!("note #{} for student {}", self.id, self.student_id)
    }
}
