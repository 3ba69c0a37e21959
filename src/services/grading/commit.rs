//! 成绩提交与批量重算

use tracing::{debug, warn};

use super::{GradingService, average};
use crate::errors::Result;
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::grading::entities::RecomputeOutcome;

impl GradingService {
    /// 计算并提交一条选课记录的总评成绩
    ///
    /// 加权平均分按当前默认评分等级制解析为字母等级与绩点后写回
    /// 选课记录。未配置默认等级制时静默跳过——这是初始化期间的
    /// 正常配置缺失状态，不作为错误向上层暴露。幂等：底层成绩不变
    /// 时重复调用产生相同结果。
    pub async fn commit_enrollment_grade(&self, enrollment_id: i64) -> Result<()> {
        let rows = self
            .storage()
            .list_graded_assessments(enrollment_id)
            .await?;
        let weighted_average = average::compute_weighted_average(&rows);

        let scale = match self.storage().get_default_grading_scale().await? {
            Some(scale) => scale,
            None => {
                debug!("未配置默认评分等级制，跳过选课记录 {enrollment_id} 的成绩提交");
                return Ok(());
            }
        };

        let (letter, points) = match scale.resolve(weighted_average) {
            Some(level) => (Some(level.letter.clone()), Some(level.gpa_points)),
            None => (None, None),
        };

        self.storage()
            .write_enrollment_computed_grade(enrollment_id, weighted_average, letter, points)
            .await
    }

    /// 重算整个班级的总评成绩
    ///
    /// 只处理状态为 enrolled 的选课记录；逐条独立处理，单条失败
    /// 记日志并继续，不中断整批。
    pub async fn batch_recompute_for_class(&self, class_id: i64) -> Result<RecomputeOutcome> {
        let enrollments = self
            .storage()
            .list_enrollments_by_class(class_id, Some(EnrollmentStatus::Enrolled))
            .await?;

        let mut outcome = RecomputeOutcome::default();
        for enrollment in enrollments {
            match self.commit_enrollment_grade(enrollment.id).await {
                Ok(()) => outcome.processed += 1,
                Err(e) => {
                    warn!("重算选课记录 {} 的成绩失败: {}", enrollment.id, e);
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::models::enrollments::requests::UpdateEnrollmentRequest;
    use crate::services::grading::GradingService;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support;

    #[tokio::test]
    async fn test_commit_without_default_scale_is_noop() {
        let ctx = test_support::seed_base().await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS101", Some(3.0)).await;
        let category_id = test_support::seed_category(&ctx.storage, class_id, 1.0).await;
        let assessment_id =
            test_support::seed_assessment(&ctx.storage, class_id, category_id, 100.0, false, None)
                .await;
        let enrollment_id =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;
        test_support::seed_grade(&ctx.storage, enrollment_id, assessment_id, 85.0).await;

        let storage: Arc<dyn Storage> = Arc::new(ctx.storage.clone());
        let service = GradingService::new(storage.clone());
        service.commit_enrollment_grade(enrollment_id).await.unwrap();

        let enrollment = storage
            .get_enrollment_by_id(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert!(enrollment.weighted_average.is_none());
        assert!(enrollment.final_letter_grade.is_none());
        assert!(enrollment.grade_points.is_none());
    }

    #[tokio::test]
    async fn test_commit_persists_average_letter_and_points() {
        let ctx = test_support::seed_base().await;
        test_support::seed_standard_scale(&ctx.storage, true).await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS102", Some(3.0)).await;
        let category_id = test_support::seed_category(&ctx.storage, class_id, 1.0).await;
        let assessment_id =
            test_support::seed_assessment(&ctx.storage, class_id, category_id, 100.0, false, None)
                .await;
        let enrollment_id =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;
        test_support::seed_grade(&ctx.storage, enrollment_id, assessment_id, 85.0).await;

        let storage: Arc<dyn Storage> = Arc::new(ctx.storage.clone());
        let service = GradingService::new(storage.clone());
        service.commit_enrollment_grade(enrollment_id).await.unwrap();

        let enrollment = storage
            .get_enrollment_by_id(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.weighted_average, Some(85.0));
        assert_eq!(enrollment.final_letter_grade.as_deref(), Some("B"));
        assert_eq!(enrollment.grade_points, Some(3.0));
    }

    #[tokio::test]
    async fn test_commit_is_idempotent() {
        let ctx = test_support::seed_base().await;
        test_support::seed_standard_scale(&ctx.storage, true).await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS103", Some(3.0)).await;
        let category_id = test_support::seed_category(&ctx.storage, class_id, 1.0).await;
        let assessment_id =
            test_support::seed_assessment(&ctx.storage, class_id, category_id, 100.0, false, None)
                .await;
        let enrollment_id =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;
        test_support::seed_grade(&ctx.storage, enrollment_id, assessment_id, 92.0).await;

        let storage: Arc<dyn Storage> = Arc::new(ctx.storage.clone());
        let service = GradingService::new(storage.clone());

        service.commit_enrollment_grade(enrollment_id).await.unwrap();
        let first = storage
            .get_enrollment_by_id(enrollment_id)
            .await
            .unwrap()
            .unwrap();

        service.commit_enrollment_grade(enrollment_id).await.unwrap();
        let second = storage
            .get_enrollment_by_id(enrollment_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.weighted_average, second.weighted_average);
        assert_eq!(first.final_letter_grade, second.final_letter_grade);
        assert_eq!(first.grade_points, second.grade_points);
        assert_eq!(second.final_letter_grade.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_commit_with_no_grades_writes_zero() {
        let ctx = test_support::seed_base().await;
        test_support::seed_standard_scale(&ctx.storage, true).await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS104", None).await;
        let enrollment_id =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;

        let storage: Arc<dyn Storage> = Arc::new(ctx.storage.clone());
        let service = GradingService::new(storage.clone());
        service.commit_enrollment_grade(enrollment_id).await.unwrap();

        let enrollment = storage
            .get_enrollment_by_id(enrollment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.weighted_average, Some(0.0));
        assert_eq!(enrollment.final_letter_grade.as_deref(), Some("F"));
    }

    #[tokio::test]
    async fn test_batch_recompute_skips_withdrawn() {
        let ctx = test_support::seed_base().await;
        test_support::seed_standard_scale(&ctx.storage, true).await;
        let (class_id, _) = test_support::seed_class(&ctx.storage, &ctx, "CS105", Some(3.0)).await;
        let category_id = test_support::seed_category(&ctx.storage, class_id, 1.0).await;
        let assessment_id =
            test_support::seed_assessment(&ctx.storage, class_id, category_id, 100.0, false, None)
                .await;

        let enrolled_id =
            test_support::seed_enrollment(&ctx.storage, ctx.student_id, class_id, None).await;
        test_support::seed_grade(&ctx.storage, enrolled_id, assessment_id, 75.0).await;

        let withdrawn_student = test_support::seed_student(&ctx.storage, "S-2002", None).await;
        let withdrawn_id =
            test_support::seed_enrollment(&ctx.storage, withdrawn_student, class_id, None).await;
        test_support::seed_grade(&ctx.storage, withdrawn_id, assessment_id, 95.0).await;

        let storage: Arc<dyn Storage> = Arc::new(ctx.storage.clone());
        storage
            .update_enrollment(
                withdrawn_id,
                UpdateEnrollmentRequest {
                    status: Some(EnrollmentStatus::Withdrawn),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let service = GradingService::new(storage.clone());
        let outcome = service.batch_recompute_for_class(class_id).await.unwrap();
        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.failed, 0);

        // 退课记录保持未计算状态
        let withdrawn = storage
            .get_enrollment_by_id(withdrawn_id)
            .await
            .unwrap()
            .unwrap();
        assert!(withdrawn.weighted_average.is_none());

        let enrolled = storage
            .get_enrollment_by_id(enrolled_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrolled.weighted_average, Some(75.0));
        assert_eq!(enrolled.final_letter_grade.as_deref(), Some("C"));
    }
}
