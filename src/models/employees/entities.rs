use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教职工实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/employee.ts")]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub title: Option<String>,
    pub photo: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Employee {
    /// 审计日志中的主体标签
    pub fn subject_label(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
