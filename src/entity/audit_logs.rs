//! 变更审计日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub entity_type: String,
    pub entity_id: i64,
    pub subject_label: String,
    pub action: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub old_values: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub new_values: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_audit_log(self) -> crate::models::audit::entities::AuditLog {
        use chrono::{DateTime, Utc};
        use crate::models::audit::entities::AuditLog;

        AuditLog {
            id: self.id,
            user_id: self.user_id,
            entity_type: self.entity_type.parse().unwrap_or_default(),
            entity_id: self.entity_id,
            subject_label: self.subject_label,
            action: self.action.parse().unwrap_or_default(),
            old_values: self
                .old_values
                .and_then(|v| serde_json::from_str(&v).ok()),
            new_values: self
                .new_values
                .and_then(|v| serde_json::from_str(&v).ok()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
