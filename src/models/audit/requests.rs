use serde::Deserialize;

use super::entities::{AuditAction, AuditEntityType};

/// 审计日志查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    pub entity_type: Option<AuditEntityType>,
    pub entity_id: Option<i64>,
    pub user_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}
