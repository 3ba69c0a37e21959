use super::SeaOrmStorage;
use crate::entity::student_notes::{ActiveModel, Column, Entity as StudentNotes};
use crate::errors::{Result, SRSystemError};
use crate::models::audit::entities::AuditEntityType;
use crate::models::notes::{
    entities::StudentNote,
    requests::{CreateStudentNoteRequest, UpdateStudentNoteRequest},
};
use crate::services::audit;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建学生备注
    ///
    /// actor 同时作为备注作者记录。
    pub async fn create_student_note_impl(
        &self,
        req: CreateStudentNoteRequest,
        actor: Option<i64>,
    ) -> Result<StudentNote> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            author_id: Set(actor),
            body: Set(req.body),
            visibility: Set(req.visibility.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("创建学生备注失败: {e}")))?;

        let note = result.into_note();
        match audit::record_created(
            actor,
            AuditEntityType::StudentNote,
            note.id,
            note.subject_label(),
            &note,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建备注创建审计记录失败: {e}"),
        }

        Ok(note)
    }

    /// 通过 ID 获取学生备注
    pub async fn get_student_note_by_id_impl(&self, id: i64) -> Result<Option<StudentNote>> {
        let result = StudentNotes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询学生备注失败: {e}")))?;

        Ok(result.map(|m| m.into_note()))
    }

    /// 更新学生备注
    pub async fn update_student_note_impl(
        &self,
        id: i64,
        update: UpdateStudentNoteRequest,
        actor: Option<i64>,
    ) -> Result<Option<StudentNote>> {
        let Some(before) = self.get_student_note_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(body) = update.body {
            model.body = Set(body);
        }

        if let Some(visibility) = update.visibility {
            model.visibility = Set(visibility.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("更新学生备注失败: {e}")))?;

        let after = self.get_student_note_by_id_impl(id).await?;

        if let Some(ref after) = after {
            match audit::record_updated(
                actor,
                AuditEntityType::StudentNote,
                id,
                before.subject_label(),
                &before,
                after,
            ) {
                Ok(Some(record)) => self.audit_insert(record).await,
                Ok(None) => {}
                Err(e) => warn!("构建备注更新审计记录失败: {e}"),
            }
        }

        Ok(after)
    }

    /// 软删除学生备注
    pub async fn delete_student_note_impl(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        let Some(before) = self.get_student_note_by_id_impl(id).await? else {
            return Ok(false);
        };
        if before.deleted_at.is_some() {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        let result = StudentNotes::update_many()
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("删除学生备注失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        match audit::record_deleted(
            actor,
            AuditEntityType::StudentNote,
            id,
            before.subject_label(),
            &before,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建备注删除审计记录失败: {e}"),
        }

        Ok(true)
    }

    /// 恢复已软删除的学生备注
    pub async fn restore_student_note_impl(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        let Some(before) = self.get_student_note_by_id_impl(id).await? else {
            return Ok(false);
        };
        if before.deleted_at.is_none() {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        let result = StudentNotes::update_many()
            .col_expr(
                Column::DeletedAt,
                sea_orm::sea_query::Expr::value(Option::<i64>::None),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_not_null())
            .exec(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("恢复学生备注失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        let record = audit::record_restored(
            actor,
            AuditEntityType::StudentNote,
            id,
            before.subject_label(),
        );
        self.audit_insert(record).await;

        Ok(true)
    }
}
