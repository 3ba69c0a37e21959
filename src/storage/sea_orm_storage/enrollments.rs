use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::{assessment_categories, assessments, classes, courses, grades};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{Result, SRSystemError};
use crate::models::audit::entities::AuditEntityType;
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus},
    requests::{CreateEnrollmentRequest, UpdateEnrollmentRequest},
};
use crate::models::grading::entities::{GpaComponent, GpaScope, GradedAssessment};
use crate::services::audit;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建选课记录
    pub async fn create_enrollment_impl(
        &self,
        req: CreateEnrollmentRequest,
        actor: Option<i64>,
    ) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            class_id: Set(req.class_id),
            cohort_id: Set(req.cohort_id),
            status: Set(EnrollmentStatus::Enrolled.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("创建选课记录失败: {e}")))?;

        let enrollment = result.into_enrollment();
        match audit::record_created(
            actor,
            AuditEntityType::Enrollment,
            enrollment.id,
            enrollment.subject_label(),
            &enrollment,
        ) {
            Ok(record) => self.audit_insert(record).await,
            Err(e) => warn!("构建选课创建审计记录失败: {e}"),
        }

        Ok(enrollment)
    }

    /// 通过 ID 获取选课记录
    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 更新选课记录的业务字段
    pub async fn update_enrollment_impl(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
        actor: Option<i64>,
    ) -> Result<Option<Enrollment>> {
        let Some(before) = self.get_enrollment_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(class_id) = update.class_id {
            model.class_id = Set(class_id);
        }

        if let Some(cohort_id) = update.cohort_id {
            model.cohort_id = Set(cohort_id);
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("更新选课记录失败: {e}")))?;

        let after = self.get_enrollment_by_id_impl(id).await?;

        if let Some(ref after) = after {
            match audit::record_updated(
                actor,
                AuditEntityType::Enrollment,
                id,
                before.subject_label(),
                &before,
                after,
            ) {
                Ok(Some(record)) => self.audit_insert(record).await,
                Ok(None) => {}
                Err(e) => warn!("构建选课更新审计记录失败: {e}"),
            }
        }

        Ok(after)
    }

    /// 列出班级的选课记录，可按状态筛选
    pub async fn list_enrollments_by_class_impl(
        &self,
        class_id: i64,
        status: Option<EnrollmentStatus>,
    ) -> Result<Vec<Enrollment>> {
        let mut select = Enrollments::find().filter(Column::ClassId.eq(class_id));

        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let result = select
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询班级选课记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_enrollment()).collect())
    }

    /// 写回成绩聚合服务计算出的派生字段
    ///
    /// 派生字段不代表任何人的变更意图，这里刻意不产生审计记录。
    pub async fn write_enrollment_computed_grade_impl(
        &self,
        id: i64,
        weighted_average: f64,
        final_letter_grade: Option<String>,
        grade_points: Option<f64>,
    ) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let result = Enrollments::update_many()
            .col_expr(
                Column::WeightedAverage,
                sea_orm::sea_query::Expr::value(weighted_average),
            )
            .col_expr(
                Column::FinalLetterGrade,
                sea_orm::sea_query::Expr::value(final_letter_grade),
            )
            .col_expr(
                Column::GradePoints,
                sea_orm::sea_query::Expr::value(grade_points),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("写回总评成绩失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(SRSystemError::not_found(format!("选课记录 {id} 不存在")));
        }

        Ok(())
    }

    /// 取某条选课记录的全部成绩，连同考核项与分类信息
    pub async fn list_graded_assessments_impl(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<GradedAssessment>> {
        let rows = grades::Entity::find()
            .filter(grades::Column::EnrollmentId.eq(enrollment_id))
            .find_also_related(assessments::Entity)
            .all(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询选课成绩失败: {e}")))?;

        let category_ids: Vec<i64> = rows
            .iter()
            .filter_map(|(_, assessment)| assessment.as_ref().map(|a| a.category_id))
            .collect();

        let weights: HashMap<i64, f64> = assessment_categories::Entity::find()
            .filter(assessment_categories::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询考核分类失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.weight))
            .collect();

        let mut result = Vec::with_capacity(rows.len());
        for (grade, assessment) in rows {
            let Some(assessment) = assessment else {
                warn!("成绩 {} 指向不存在的考核项，跳过", grade.id);
                continue;
            };
            let Some(&category_weight) = weights.get(&assessment.category_id) else {
                warn!("考核项 {} 指向不存在的分类，跳过", assessment.id);
                continue;
            };

            result.push(GradedAssessment {
                category_id: assessment.category_id,
                category_weight,
                adjusted_score: grade.adjusted_score,
                max_score: assessment.max_score,
                is_extra_credit: assessment.is_extra_credit,
                assessment_weight: assessment.weight,
            });
        }

        Ok(result)
    }

    /// 取某口径下的 GPA 聚合输入（绩点 × 学分）
    ///
    /// 只取已有绩点的选课记录；学分来自课程，NULL 原样带出，
    /// 由聚合算法按 1.0 处理。
    pub async fn list_gpa_components_impl(&self, scope: GpaScope) -> Result<Vec<GpaComponent>> {
        let mut select = Enrollments::find()
            .join(JoinType::InnerJoin, crate::entity::enrollments::Relation::Class.def())
            .join(JoinType::InnerJoin, classes::Relation::Course.def())
            .select_only()
            .column(Column::GradePoints)
            .column(courses::Column::Credits)
            .filter(Column::GradePoints.is_not_null());

        select = match scope {
            GpaScope::Term {
                student_id,
                term_id,
            } => select
                .filter(Column::StudentId.eq(student_id))
                .filter(classes::Column::TermId.eq(term_id)),
            GpaScope::Cumulative { student_id } => select.filter(Column::StudentId.eq(student_id)),
            GpaScope::Cohort { cohort_id } => select.filter(Column::CohortId.eq(cohort_id)),
        };

        let rows: Vec<(Option<f64>, Option<f64>)> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询 GPA 输入失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(grade_points, credits)| {
                grade_points.map(|grade_points| GpaComponent {
                    grade_points,
                    credits,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::models::audit::entities::{AuditAction, AuditEntityType};
    use crate::models::audit::requests::AuditLogQuery;
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::models::enrollments::requests::UpdateEnrollmentRequest;
    use crate::models::grading::entities::GpaScope;
    use crate::services::grading::GradingService;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support;
    use serde_json::json;

    #[tokio::test]
    async fn test_status_change_audits_status_only() {
        let ctx = test_support::seed_base().await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS201", None).await;
        let enrollment_id =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;

        ctx.storage
            .update_enrollment_impl(
                enrollment_id,
                UpdateEnrollmentRequest {
                    status: Some(EnrollmentStatus::Completed),
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
                entity_type: Some(AuditEntityType::Enrollment),
                entity_id: Some(enrollment_id),
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(logs.pagination.total, 1);
        assert_eq!(
            logs.items[0].old_values,
            Some(json!({"status": "enrolled"}))
        );
        assert_eq!(
            logs.items[0].new_values,
            Some(json!({"status": "completed"}))
        );
    }

    #[tokio::test]
    async fn test_clearing_cohort_is_audited() {
        let ctx = test_support::seed_base().await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS205", None).await;
        let enrollment_id = test_support::seed_enrollment(
            &ctx.storage,
            ctx.student_id,
            class_id,
            Some(ctx.cohort_id),
        )
        .await;

        // 显式 null 使选课记录脱离届别
        let updated = ctx
            .storage
            .update_enrollment_impl(
                enrollment_id,
                UpdateEnrollmentRequest {
                    cohort_id: Some(None),
                    ..Default::default()
                },
                Some(ctx.teacher_id),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.cohort_id, None);

        let logs = ctx
            .storage
            .list_audit_logs_with_pagination_impl(AuditLogQuery {
                entity_type: Some(AuditEntityType::Enrollment),
                entity_id: Some(enrollment_id),
                action: Some(AuditAction::Updated),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(logs.pagination.total, 1);
        assert_eq!(
            logs.items[0].old_values,
            Some(json!({"cohort_id": ctx.cohort_id}))
        );
        assert_eq!(logs.items[0].new_values, Some(json!({"cohort_id": null})));
    }

    #[tokio::test]
    async fn test_derived_grade_write_is_not_audited() {
        let ctx = test_support::seed_base().await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS202", None).await;
        let enrollment_id =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;

        ctx.storage
            .write_enrollment_computed_grade_impl(enrollment_id, 88.5, Some("B".into()), Some(3.0))
            .await
            .unwrap();

        let enrollment = ctx
            .storage
            .get_enrollment_by_id_impl(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.weighted_average, Some(88.5));

        let logs = ctx
            .storage
            .list_audit_logs_with_pagination_impl(AuditLogQuery {
                entity_type: Some(AuditEntityType::Enrollment),
                entity_id: Some(enrollment_id),
                ..Default::default()
            })
            .await
            .unwrap();

        // 仅创建记录本身的一条，派生字段写回不产生审计
        assert_eq!(logs.pagination.total, 1);
        assert_eq!(logs.items[0].action, AuditAction::Created);
    }

    #[tokio::test]
    async fn test_list_by_class_filters_status() {
        let ctx = test_support::seed_base().await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS203", None).await;

        let first =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;
        let second_student = test_support::seed_student(&ctx.storage, "S-3001", None).await;
        let second =
            test_support::seed_enrollment(&ctx.storage, second_student, class_id, None).await;

        ctx.storage
            .update_enrollment_impl(
                second,
                UpdateEnrollmentRequest {
                    status: Some(EnrollmentStatus::Withdrawn),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let all = ctx
            .storage
            .list_enrollments_by_class_impl(class_id, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let enrolled = ctx
            .storage
            .list_enrollments_by_class_impl(class_id, Some(EnrollmentStatus::Enrolled))
            .await
            .unwrap();
        assert_eq!(enrolled.len(), 1);
        assert_eq!(enrolled[0].id, first);
    }

    #[tokio::test]
    async fn test_gpa_scopes() {
        let ctx = test_support::seed_base().await;
        let spring_id = test_support::seed_term(&ctx.storage, ctx.academic_year_id, "Spring").await;

        // 秋季 4 学分得 A，春季 1 学分得 C
        let (fall_class, _) = test_support::seed_class(&ctx.storage, &ctx, "MATH101", Some(4.0)).await;
        let (spring_class, _) = test_support::seed_class_in_term(
            &ctx.storage,
            spring_id,
            ctx.teacher_id,
            "HIST101",
            Some(1.0),
        )
        .await;

        let fall_enrollment = test_support::seed_enrollment(
            &ctx.storage,
            ctx.student_id,
            fall_class,
            Some(ctx.cohort_id),
        )
        .await;
        let spring_enrollment = test_support::seed_enrollment(
            &ctx.storage,
            ctx.student_id,
            spring_class,
            Some(ctx.cohort_id),
        )
        .await;

        ctx.storage
            .write_enrollment_computed_grade_impl(fall_enrollment, 95.0, Some("A".into()), Some(4.0))
            .await
            .unwrap();
        ctx.storage
            .write_enrollment_computed_grade_impl(
                spring_enrollment,
                72.0,
                Some("C".into()),
                Some(2.0),
            )
            .await
            .unwrap();

        let storage: Arc<dyn Storage> = Arc::new(ctx.storage.clone());
        let service = GradingService::new(storage);

        // 学期口径只含该学期的课
        assert_eq!(
            service.term_gpa(ctx.student_id, ctx.term_id).await.unwrap(),
            4.0
        );
        // 累计口径按学分加权：(4.0×4 + 2.0×1) / 5 = 3.6
        assert_eq!(service.cumulative_gpa(ctx.student_id).await.unwrap(), 3.6);
        // 届别口径覆盖该届全部选课记录
        assert_eq!(service.cohort_gpa(ctx.cohort_id).await.unwrap(), 3.6);
    }

    #[tokio::test]
    async fn test_gpa_ignores_uncomputed_enrollments() {
        let ctx = test_support::seed_base().await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS204", Some(3.0)).await;
        test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;

        let components = ctx
            .storage
            .list_gpa_components_impl(GpaScope::Cumulative {
                student_id: ctx.student_id,
            })
            .await
            .unwrap();

        assert!(components.is_empty());
    }
}
