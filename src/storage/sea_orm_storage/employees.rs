use super::SeaOrmStorage;
use crate::entity::employees::{ActiveModel, Column, Entity as Employees};
use crate::errors::{Result, SRSystemError};
use crate::models::audit::entities::AuditEntityType;
use crate::models::employees::{
    entities::Employee,
    requests::{CreateEmployeeRequest, UpdateEmployeeRequest},
};
use crate::services::audit;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建教职工
    pub async fn create_employee_impl(
        &self,
        req: CreateEmployeeRequest,
        actor: Option<i64>,
    ) -> Result<Employee> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            email: Set(req.email),
            title: Set(req.title),
            photo: Set(req.photo),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("创建教职工失败: {e}")))?;

        let employee = result.into_employee();
        match audit::record_created(
            actor,
            AuditEntityType::Employee,
            employee.id,
            employee.subject_label(),
            &employee,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建教职工创建审计记录失败: {e}"),
        }

        Ok(employee)
    }

    /// 通过 ID 获取教职工
    pub async fn get_employee_by_id_impl(&self, id: i64) -> Result<Option<Employee>> {
        let result = Employees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询教职工失败: {e}")))?;

        Ok(result.map(|m| m.into_employee()))
    }

    /// 更新教职工信息
    pub async fn update_employee_impl(
        &self,
        id: i64,
        update: UpdateEmployeeRequest,
        actor: Option<i64>,
    ) -> Result<Option<Employee>> {
        let Some(before) = self.get_employee_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }

        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(title) = update.title {
            model.title = Set(Some(title));
        }

        if let Some(photo) = update.photo {
            model.photo = Set(Some(photo));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("更新教职工失败: {e}")))?;

        let after = self.get_employee_by_id_impl(id).await?;

        if let Some(ref after) = after {
            match audit::record_updated(
                actor,
                AuditEntityType::Employee,
                id,
                before.subject_label(),
                &before,
                after,
            ) {
                Ok(Some(record)) => self.audit_insert(record).await,
                Ok(None) => {}
                Err(e) => warn!("构建教职工更新审计记录失败: {e}"),
            }
        }

        Ok(after)
    }

    /// 软删除教职工
    pub async fn delete_employee_impl(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        let Some(before) = self.get_employee_by_id_impl(id).await? else {
            return Ok(false);
        };
        if before.deleted_at.is_some() {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        let result = Employees::update_many()
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("删除教职工失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        match audit::record_deleted(
            actor,
            AuditEntityType::Employee,
            id,
            before.subject_label(),
            &before,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建教职工删除审计记录失败: {e}"),
        }

        Ok(true)
    }

    /// 恢复已软删除的教职工
    pub async fn restore_employee_impl(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        let Some(before) = self.get_employee_by_id_impl(id).await? else {
            return Ok(false);
        };
        if before.deleted_at.is_none() {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        let result = Employees::update_many()
            .col_expr(
                Column::DeletedAt,
                sea_orm::sea_query::Expr::value(Option::<i64>::None),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_not_null())
            .exec(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("恢复教职工失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        let record =
            audit::record_restored(actor, AuditEntityType::Employee, id, before.subject_label());
        self.audit_insert(record).await;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::audit::entities::{AuditAction, AuditEntityType};
    use crate::models::audit::requests::AuditLogQuery;
    use crate::models::employees::requests::{CreateEmployeeRequest, UpdateEmployeeRequest};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_title_is_audited() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let employee = storage
            .create_employee_impl(
                CreateEmployeeRequest {
                    first_name: "Mei".into(),
                    last_name: "Lin".into(),
                    email: "mei.lin@example.edu".into(),
                    title: Some("Lecturer".into()),
                    photo: None,
                },
                None,
            )
            .await
            .unwrap();

        storage
            .update_employee_impl(
                employee.id,
                UpdateEmployeeRequest {
                    title: Some("Senior Lecturer".into()),
                    ..Default::default()
                },
                Some(employee.id),
            )
            .await
            .unwrap()
            .unwrap();

        let logs = storage
            .list_audit_logs_with_pagination_impl(AuditLogQuery {
                entity_type: Some(AuditEntityType::Employee),
                entity_id: Some(employee.id),
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(logs.pagination.total, 1);
        assert_eq!(
            logs.items[0].old_values,
            Some(json!({"title": "Lecturer"}))
        );
        assert_eq!(
            logs.items[0].new_values,
            Some(json!({"title": "Senior Lecturer"}))
        );
    }

    #[tokio::test]
    async fn test_restore_without_delete_is_noop() {
        let storage = SeaOrmStorage::new_in_memory().await;

        let employee = storage
            .create_employee_impl(
                CreateEmployeeRequest {
                    first_name: "Mei".into(),
                    last_name: "Lin".into(),
                    email: "mei.lin@example.edu".into(),
                    title: None,
                    photo: None,
                },
                None,
            )
            .await
            .unwrap();

        assert!(!storage.restore_employee_impl(employee.id, None).await.unwrap());
    }
}
