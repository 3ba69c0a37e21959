use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Entity as Grades};
use crate::errors::{Result, SRSystemError};
use crate::models::audit::entities::AuditEntityType;
use crate::models::grades::{
    entities::{Grade, adjusted_score},
    requests::{CreateGradeRequest, UpdateGradeRequest},
};
use crate::services::audit;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tracing::warn;

impl SeaOrmStorage {
    /// 录入成绩
    ///
    /// adjusted_score 在此派生一次并落库，actor 同时作为评分人记录。
    pub async fn create_grade_impl(
        &self,
        req: CreateGradeRequest,
        actor: Option<i64>,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();
        let adjusted = adjusted_score(req.score, req.is_late, req.late_penalty);

        let model = ActiveModel {
            enrollment_id: Set(req.enrollment_id),
            assessment_id: Set(req.assessment_id),
            score: Set(req.score),
            is_late: Set(req.is_late),
            late_penalty: Set(req.late_penalty),
            adjusted_score: Set(adjusted),
            comment: Set(req.comment),
            graded_by: Set(actor),
            graded_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("录入成绩失败: {e}")))?;

        let grade = result.into_grade();
        match audit::record_created(
            actor,
            AuditEntityType::Grade,
            grade.id,
            grade.subject_label(),
            &grade,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建成绩创建审计记录失败: {e}"),
        }

        Ok(grade)
    }

    /// 通过 ID 获取成绩
    pub async fn get_grade_by_id_impl(&self, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 更新成绩
    ///
    /// 任一评分输入变化都重新派生 adjusted_score。
    pub async fn update_grade_impl(
        &self,
        id: i64,
        update: UpdateGradeRequest,
        actor: Option<i64>,
    ) -> Result<Option<Grade>> {
        let Some(before) = self.get_grade_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let score = update.score.unwrap_or(before.score);
        let is_late = update.is_late.unwrap_or(before.is_late);
        let late_penalty = match update.late_penalty {
            Some(late_penalty) => late_penalty,
            None => before.late_penalty,
        };
        let adjusted = adjusted_score(score, is_late, late_penalty);

        let mut model = ActiveModel {
            id: Set(id),
            score: Set(score),
            is_late: Set(is_late),
            late_penalty: Set(late_penalty),
            adjusted_score: Set(adjusted),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(comment) = update.comment {
            model.comment = Set(Some(comment));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("更新成绩失败: {e}")))?;

        let after = self.get_grade_by_id_impl(id).await?;

        if let Some(ref after) = after {
            match audit::record_updated(
                actor,
                AuditEntityType::Grade,
                id,
                before.subject_label(),
                &before,
                after,
            ) {
                Ok(Some(record)) => self.audit_insert(record).await,
                Ok(None) => {}
                Err(e) => warn!("构建成绩更新审计记录失败: {e}"),
            }
        }

        Ok(after)
    }

    /// 删除成绩
    pub async fn delete_grade_impl(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        let Some(before) = self.get_grade_by_id_impl(id).await? else {
            return Ok(false);
        };

        let result = Grades::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("删除成绩失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        match audit::record_deleted(
            actor,
            AuditEntityType::Grade,
            id,
            before.subject_label(),
            &before,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建成绩删除审计记录失败: {e}"),
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::audit::entities::{AuditAction, AuditEntityType};
    use crate::models::audit::requests::AuditLogQuery;
    use crate::models::grades::requests::{CreateGradeRequest, UpdateGradeRequest};
    use crate::storage::sea_orm_storage::test_support;
    use serde_json::json;

    async fn seed_graded_context() -> (test_support::SeedContext, i64, i64) {
        let ctx = test_support::seed_base().await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS301", None).await;
        let category_id = test_support::seed_category(&ctx.storage, class_id, 1.0).await;
        let assessment_id =
            test_support::seed_assessment(&ctx.storage, class_id, category_id, 100.0, false, None)
                .await;
        let enrollment_id =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;
        (ctx, enrollment_id, assessment_id)
    }

    #[tokio::test]
    async fn test_late_grade_derives_adjusted_score() {
        let (ctx, enrollment_id, assessment_id) = seed_graded_context().await;

        let grade = ctx
            .storage
            .create_grade_impl(
                CreateGradeRequest {
                    enrollment_id,
                    assessment_id,
                    score: 100.0,
                    is_late: true,
                    late_penalty: Some(10.0),
                    comment: None,
                },
                Some(ctx.teacher_id),
            )
            .await
            .unwrap();

        assert_eq!(grade.adjusted_score, 90.0);
        assert_eq!(grade.graded_by, Some(ctx.teacher_id));
    }

    #[tokio::test]
    async fn test_score_update_audits_both_raw_and_adjusted() {
        let (ctx, enrollment_id, assessment_id) = seed_graded_context().await;

        let grade = ctx
            .storage
            .create_grade_impl(
                CreateGradeRequest {
                    enrollment_id,
                    assessment_id,
                    score: 80.0,
                    is_late: false,
                    late_penalty: None,
                    comment: None,
                },
                Some(ctx.teacher_id),
            )
            .await
            .unwrap();

        ctx.storage
            .update_grade_impl(
                grade.id,
                UpdateGradeRequest {
                    score: Some(85.0),
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
                entity_type: Some(AuditEntityType::Grade),
                entity_id: Some(grade.id),
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(logs.pagination.total, 1);
        assert_eq!(
            logs.items[0].old_values,
            Some(json!({"score": 80.0, "adjusted_score": 80.0}))
        );
        assert_eq!(
            logs.items[0].new_values,
            Some(json!({"score": 85.0, "adjusted_score": 85.0}))
        );
    }

    #[tokio::test]
    async fn test_clearing_late_penalty_rederives_adjusted_score() {
        let (ctx, enrollment_id, assessment_id) = seed_graded_context().await;

        let grade = ctx
            .storage
            .create_grade_impl(
                CreateGradeRequest {
                    enrollment_id,
                    assessment_id,
                    score: 100.0,
                    is_late: true,
                    late_penalty: Some(10.0),
                    comment: None,
                },
                Some(ctx.teacher_id),
            )
            .await
            .unwrap();
        assert_eq!(grade.adjusted_score, 90.0);

        // 外层缺省，折减保持原值
        let kept = ctx
            .storage
            .update_grade_impl(
                grade.id,
                UpdateGradeRequest {
                    score: Some(95.0),
                    ..Default::default()
                },
                Some(ctx.teacher_id),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.late_penalty, Some(10.0));
        assert_eq!(kept.adjusted_score, 85.5);

        // 显式 null，折减清空并重新派生
        let cleared = ctx
            .storage
            .update_grade_impl(
                grade.id,
                UpdateGradeRequest {
                    late_penalty: Some(None),
                    ..Default::default()
                },
                Some(ctx.teacher_id),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.late_penalty, None);
        assert_eq!(cleared.adjusted_score, 95.0);
    }

    #[tokio::test]
    async fn test_delete_captures_final_state() {
        let (ctx, enrollment_id, assessment_id) = seed_graded_context().await;

        let grade = ctx
            .storage
            .create_grade_impl(
                CreateGradeRequest {
                    enrollment_id,
                    assessment_id,
                    score: 64.0,
                    is_late: false,
                    late_penalty: None,
                    comment: Some("Partial solutions".into()),
                },
                Some(ctx.teacher_id),
            )
            .await
            .unwrap();

        assert!(
            ctx.storage
                .delete_grade_impl(grade.id, Some(ctx.teacher_id))
                .await
                .unwrap()
        );
        assert!(
            ctx.storage
                .get_grade_by_id_impl(grade.id)
                .await
                .unwrap()
                .is_none()
        );

        let logs = ctx
            .storage
            .list_audit_logs_with_pagination_impl(AuditLogQuery {
                entity_type: Some(AuditEntityType::Grade),
                entity_id: Some(grade.id),
                action: Some(AuditAction::Deleted),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(logs.pagination.total, 1);
        let old_values = logs.items[0].old_values.as_ref().unwrap();
        assert_eq!(old_values["score"], json!(64.0));
        assert_eq!(old_values["comment"], json!("Partial solutions"));
        // 时间戳在黑名单内
        assert!(old_values.get("graded_at").is_none());
    }
}
