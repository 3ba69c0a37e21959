//! 内存存储与测试数据种子
//!
//! 学年/学期/届别/课程等非追踪实体直接走 ActiveModel 插入；
//! 被审计覆盖的实体走存储层的正式方法，让测试同时覆盖审计路径。

use sea_orm::{ActiveModelTrait, Set};

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::models::enrollments::requests::CreateEnrollmentRequest;
use crate::models::grades::requests::CreateGradeRequest;
use crate::models::scales::requests::{CreateGradingScaleRequest, GradeLevelInput};
use crate::models::students::requests::CreateStudentRequest;

pub(crate) struct SeedContext {
    pub storage: SeaOrmStorage,
    pub academic_year_id: i64,
    pub term_id: i64,
    pub cohort_id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
}

/// 建一套最小的学年/学期/届别/教师/学生基础数据
pub(crate) async fn seed_base() -> SeedContext {
    let storage = SeaOrmStorage::new_in_memory().await;
    let now = chrono::Utc::now().timestamp();

    let year = AcademicYearActiveModel {
        name: Set("2025-2026".to_string()),
        starts_on: Set(now),
        ends_on: Set(now + 365 * 86400),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子学年失败");

    let term = TermActiveModel {
        academic_year_id: Set(year.id),
        name: Set("Fall".to_string()),
        starts_on: Set(now),
        ends_on: Set(now + 120 * 86400),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子学期失败");

    let cohort = CohortActiveModel {
        academic_year_id: Set(year.id),
        name: Set("Class of 2029".to_string()),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子届别失败");

    let teacher = EmployeeActiveModel {
        first_name: Set("Mei".to_string()),
        last_name: Set("Lin".to_string()),
        email: Set("mei.lin@example.edu".to_string()),
        title: Set(Some("Lecturer".to_string())),
        photo: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子教师失败");

    let student = storage
        .create_student_impl(
            CreateStudentRequest {
                first_name: "Wei".to_string(),
                last_name: "Chen".to_string(),
                student_number: "S-1001".to_string(),
                email: None,
                cohort_id: Some(cohort.id),
                photo: None,
            },
            None,
        )
        .await
        .expect("种子学生失败");

    SeedContext {
        storage,
        academic_year_id: year.id,
        term_id: term.id,
        cohort_id: cohort.id,
        teacher_id: teacher.id,
        student_id: student.id,
    }
}

pub(crate) async fn seed_student(
    storage: &SeaOrmStorage,
    student_number: &str,
    cohort_id: Option<i64>,
) -> i64 {
    storage
        .create_student_impl(
            CreateStudentRequest {
                first_name: "Jia".to_string(),
                last_name: "Wang".to_string(),
                student_number: student_number.to_string(),
                email: None,
                cohort_id,
                photo: None,
            },
            None,
        )
        .await
        .expect("种子学生失败")
        .id
}

pub(crate) async fn seed_term(
    storage: &SeaOrmStorage,
    academic_year_id: i64,
    name: &str,
) -> i64 {
    let now = chrono::Utc::now().timestamp();
    TermActiveModel {
        academic_year_id: Set(academic_year_id),
        name: Set(name.to_string()),
        starts_on: Set(now),
        ends_on: Set(now + 120 * 86400),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子学期失败")
    .id
}

/// 建课程和班级，返回 (class_id, course_id)
pub(crate) async fn seed_class(
    storage: &SeaOrmStorage,
    ctx: &SeedContext,
    code: &str,
    credits: Option<f64>,
) -> (i64, i64) {
    seed_class_in_term(storage, ctx.term_id, ctx.teacher_id, code, credits).await
}

pub(crate) async fn seed_class_in_term(
    storage: &SeaOrmStorage,
    term_id: i64,
    teacher_id: i64,
    code: &str,
    credits: Option<f64>,
) -> (i64, i64) {
    let course = CourseActiveModel {
        code: Set(code.to_string()),
        title: Set(format!("Course {code}")),
        credits: Set(credits),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子课程失败");

    let class = ClassActiveModel {
        course_id: Set(course.id),
        term_id: Set(term_id),
        teacher_id: Set(teacher_id),
        name: Set(format!("{code} Section A")),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子班级失败");

    (class.id, course.id)
}

pub(crate) async fn seed_category(storage: &SeaOrmStorage, class_id: i64, weight: f64) -> i64 {
    AssessmentCategoryActiveModel {
        class_id: Set(class_id),
        name: Set("Homework".to_string()),
        weight: Set(weight),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子考核分类失败")
    .id
}

pub(crate) async fn seed_assessment(
    storage: &SeaOrmStorage,
    class_id: i64,
    category_id: i64,
    max_score: f64,
    is_extra_credit: bool,
    weight: Option<f64>,
) -> i64 {
    let now = chrono::Utc::now().timestamp();
    AssessmentActiveModel {
        class_id: Set(class_id),
        category_id: Set(category_id),
        title: Set("Assessment".to_string()),
        max_score: Set(max_score),
        is_extra_credit: Set(is_extra_credit),
        weight: Set(weight),
        status: Set("published".to_string()),
        due_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&storage.db)
    .await
    .expect("种子考核项失败")
    .id
}

pub(crate) async fn seed_enrollment(
    storage: &SeaOrmStorage,
    student_id: i64,
    class_id: i64,
    cohort_id: Option<i64>,
) -> i64 {
    storage
        .create_enrollment_impl(
            CreateEnrollmentRequest {
                student_id,
                class_id,
                cohort_id,
            },
            None,
        )
        .await
        .expect("种子选课记录失败")
        .id
}

pub(crate) async fn seed_grade(
    storage: &SeaOrmStorage,
    enrollment_id: i64,
    assessment_id: i64,
    score: f64,
) -> i64 {
    storage
        .create_grade_impl(
            CreateGradeRequest {
                enrollment_id,
                assessment_id,
                score,
                is_late: false,
                late_penalty: None,
                comment: None,
            },
            None,
        )
        .await
        .expect("种子成绩失败")
        .id
}

/// 标准 A-F 等级制
pub(crate) async fn seed_standard_scale(storage: &SeaOrmStorage, is_default: bool) -> i64 {
    let levels = [
        ("A", 90.0, 4.0),
        ("B", 80.0, 3.0),
        ("C", 70.0, 2.0),
        ("D", 60.0, 1.0),
        ("F", 0.0, 0.0),
    ];

    storage
        .create_grading_scale_impl(CreateGradingScaleRequest {
            name: "Standard".to_string(),
            is_default,
            levels: levels
                .iter()
                .map(|(letter, min_percentage, gpa_points)| GradeLevelInput {
                    letter: letter.to_string(),
                    min_percentage: *min_percentage,
                    gpa_points: *gpa_points,
                })
                .collect(),
        })
        .await
        .expect("种子评分等级制失败")
        .id
}
