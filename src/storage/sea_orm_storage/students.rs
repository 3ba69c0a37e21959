use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, SRSystemError};
use crate::models::students::{
    entities::{Student, StudentStatus},
    requests::{CreateStudentRequest, UpdateStudentRequest},
};
use crate::services::audit;
use crate::models::audit::entities::AuditEntityType;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(
        &self,
        req: CreateStudentRequest,
        actor: Option<i64>,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            student_number: Set(req.student_number),
            email: Set(req.email),
            cohort_id: Set(req.cohort_id),
            photo: Set(req.photo),
            status: Set(StudentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("创建学生失败: {e}")))?;

        let student = result.into_student();
        match audit::record_created(
            actor,
            AuditEntityType::Student,
            student.id,
            student.subject_label(),
            &student,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建学生创建审计记录失败: {e}"),
        }

        Ok(student)
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 更新学生信息
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        actor: Option<i64>,
    ) -> Result<Option<Student>> {
        // 先取变更前快照
        let Some(before) = self.get_student_by_id_impl(id).await? else {
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
            model.email = Set(Some(email));
        }

        if let Some(cohort_id) = update.cohort_id {
            model.cohort_id = Set(Some(cohort_id));
        }

        if let Some(photo) = update.photo {
            model.photo = Set(Some(photo));
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("更新学生失败: {e}")))?;

        let after = self.get_student_by_id_impl(id).await?;

        if let Some(ref after) = after {
            match audit::record_updated(
                actor,
                AuditEntityType::Student,
                id,
                before.subject_label(),
                &before,
                after,
            ) {
                Ok(Some(record)) => self.audit_insert(record).await,
                Ok(None) => {}
                Err(e) => warn!("构建学生更新审计记录失败: {e}"),
            }
        }

        Ok(after)
    }

    /// 软删除学生
    pub async fn delete_student_impl(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        let Some(before) = self.get_student_by_id_impl(id).await? else {
            return Ok(false);
        };
        if before.deleted_at.is_some() {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        let result = Students::update_many()
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("删除学生失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        match audit::record_deleted(
            actor,
            AuditEntityType::Student,
            id,
            before.subject_label(),
            &before,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建学生删除审计记录失败: {e}"),
        }

        Ok(true)
    }

    /// 恢复已软删除的学生
    pub async fn restore_student_impl(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        let Some(before) = self.get_student_by_id_impl(id).await? else {
            return Ok(false);
        };
        if before.deleted_at.is_none() {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        let result = Students::update_many()
            .col_expr(
                Column::DeletedAt,
                sea_orm::sea_query::Expr::value(Option::<i64>::None),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_not_null())
            .exec(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("恢复学生失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        let record =
            audit::record_restored(actor, AuditEntityType::Student, id, before.subject_label());
        self.audit_insert(record).await;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::audit::entities::{AuditAction, AuditEntityType};
    use crate::models::audit::requests::AuditLogQuery;
    use crate::models::students::requests::UpdateStudentRequest;
    use crate::storage::sea_orm_storage::test_support;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_emits_created_audit() {
        let ctx = test_support::seed_base().await;

        let logs = ctx
            .storage
            .list_audit_logs_with_pagination_impl(AuditLogQuery {
                entity_type: Some(AuditEntityType::Student),
                entity_id: Some(ctx.student_id),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(logs.pagination.total, 1);
        let log = &logs.items[0];
        assert_eq!(log.action, AuditAction::Created);
        assert!(log.old_values.is_none());
        let new_values = log.new_values.as_ref().unwrap();
        assert_eq!(new_values["student_number"], json!("S-1001"));
        // 黑名单字段不入快照
        assert!(new_values.get("photo").is_none());
        assert!(new_values.get("created_at").is_none());
    }

    #[tokio::test]
    async fn test_update_audits_only_changed_fields() {
        let ctx = test_support::seed_base().await;

        ctx.storage
            .update_student_impl(
                ctx.student_id,
                UpdateStudentRequest {
                    email: Some("wei.chen@example.edu".into()),
                    ..Default::default()
                },
                Some(ctx.teacher_id),
            )
            .await
            .unwrap()
            .unwrap();

        let logs = ctx
            .storage
            .list_audit_logs_with_pagination_impl(AuditLogQuery {
                entity_type: Some(AuditEntityType::Student),
                entity_id: Some(ctx.student_id),
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(logs.pagination.total, 1);
        let log = &logs.items[0];
        assert_eq!(log.user_id, Some(ctx.teacher_id));
        assert_eq!(
            log.new_values,
            Some(json!({"email": "wei.chen@example.edu"}))
        );
        // 未变化的字段不进差异
        assert!(log.old_values.as_ref().unwrap().get("first_name").is_none());
    }

    #[tokio::test]
    async fn test_photo_only_update_is_not_audited() {
        let ctx = test_support::seed_base().await;

        ctx.storage
            .update_student_impl(
                ctx.student_id,
                UpdateStudentRequest {
                    photo: Some("base64-blob".into()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap()
            .unwrap();

        let logs = ctx
            .storage
            .list_audit_logs_with_pagination_impl(AuditLogQuery {
                entity_type: Some(AuditEntityType::Student),
                entity_id: Some(ctx.student_id),
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(logs.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_soft_delete_and_restore_lifecycle() {
        let ctx = test_support::seed_base().await;

        assert!(
            ctx.storage
                .delete_student_impl(ctx.student_id, Some(ctx.teacher_id))
                .await
                .unwrap()
        );
        // 二次删除是空操作
        assert!(
            !ctx.storage
                .delete_student_impl(ctx.student_id, Some(ctx.teacher_id))
                .await
                .unwrap()
        );

        let deleted = ctx
            .storage
            .get_student_by_id_impl(ctx.student_id)
            .await
            .unwrap()
            .unwrap();
        assert!(deleted.deleted_at.is_some());

        assert!(
            ctx.storage
                .restore_student_impl(ctx.student_id, Some(ctx.teacher_id))
                .await
                .unwrap()
        );
        let restored = ctx
            .storage
            .get_student_by_id_impl(ctx.student_id)
            .await
            .unwrap()
            .unwrap();
        assert!(restored.deleted_at.is_none());

        let logs = ctx
            .storage
            .list_audit_logs_with_pagination_impl(AuditLogQuery {
                entity_type: Some(AuditEntityType::Student),
                entity_id: Some(ctx.student_id),
                ..Default::default()
            })
            .await
            .unwrap();

        // created + deleted + restored
        assert_eq!(logs.pagination.total, 3);
        assert_eq!(logs.items[0].action, AuditAction::Restored);
        assert!(logs.items[0].old_values.is_none());
        assert!(logs.items[0].new_values.is_none());
        assert_eq!(logs.items[1].action, AuditAction::Deleted);
        assert!(logs.items[1].new_values.is_none());
        assert_eq!(
            logs.items[1].old_values.as_ref().unwrap()["student_number"],
            json!("S-1001")
        );
    }
}
