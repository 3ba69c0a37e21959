use super::SeaOrmStorage;
use crate::entity::audit_logs::{ActiveModel, Column, Entity as AuditLogs};
use crate::errors::{Result, SRSystemError};
use crate::models::{
    PaginationInfo,
    audit::{entities::AuditLog, requests::AuditLogQuery, responses::AuditLogListResponse},
};
use crate::services::audit::AuditRecord;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::warn;

impl SeaOrmStorage {
    /// 追加一条审计记录
    ///
    /// 审计日志只追加：本存储层不提供更新或删除方法。
    pub async fn insert_audit_log_impl(&self, record: AuditRecord) -> Result<AuditLog> {
        let now = chrono::Utc::now().timestamp();

        let old_values = record
            .old_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let new_values = record
            .new_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let model = ActiveModel {
            user_id: Set(record.user_id),
            entity_type: Set(record.entity_type.to_string()),
            entity_id: Set(record.entity_id),
            subject_label: Set(record.subject_label),
            action: Set(record.action.to_string()),
            old_values: Set(old_values),
            new_values: Set(new_values),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("写入审计记录失败: {e}")))?;

        Ok(result.into_audit_log())
    }

    /// 落库一条审计记录，失败只告警
    ///
    /// 审计是业务变更的旁路观察：记录写入失败不能让已经成功的
    /// 变更对调用方表现为失败。
    pub(crate) async fn audit_insert(&self, record: AuditRecord) {
        if let Err(e) = self.insert_audit_log_impl(record).await {
            warn!("审计记录写入失败: {e}");
        }
    }

    /// 分页查询审计日志
    pub async fn list_audit_logs_with_pagination_impl(
        &self,
        query: AuditLogQuery,
    ) -> Result<AuditLogListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = AuditLogs::find();

        if let Some(entity_type) = query.entity_type {
            select = select.filter(Column::EntityType.eq(entity_type.to_string()));
        }

        if let Some(entity_id) = query.entity_id {
            select = select.filter(Column::EntityId.eq(entity_id));
        }

        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        if let Some(action) = query.action {
            select = select.filter(Column::Action.eq(action.to_string()));
        }

        // 最新的在前，同一秒内按插入顺序倒排
        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询审计日志总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询审计日志页数失败: {e}")))?;

        let logs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询审计日志列表失败: {e}")))?;

        Ok(AuditLogListResponse {
            items: logs.into_iter().map(|m| m.into_audit_log()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}
