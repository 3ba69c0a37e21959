use std::sync::Arc;

use crate::models::{
    audit::{requests::AuditLogQuery, responses::AuditLogListResponse},
    classes::entities::Class,
    employees::{
        entities::Employee,
        requests::{CreateEmployeeRequest, UpdateEmployeeRequest},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::{CreateEnrollmentRequest, UpdateEnrollmentRequest},
    },
    grades::{
        entities::Grade,
        requests::{CreateGradeRequest, UpdateGradeRequest},
    },
    grading::entities::{GpaScope, GradedAssessment},
    notes::{
        entities::StudentNote,
        requests::{CreateStudentNoteRequest, UpdateStudentNoteRequest},
    },
    scales::{entities::GradingScale, requests::CreateGradingScaleRequest},
    students::{
        entities::Student,
        requests::{CreateStudentRequest, UpdateStudentRequest},
    },
};

use crate::errors::Result;
use crate::services::audit::AuditRecord;

pub mod sea_orm_storage;

/// 统一存储接口
///
/// 被追踪实体（学生 / 教职工 / 备注 / 选课 / 成绩）的变更方法都带
/// `actor` 参数——发起变更的教职工 id，系统触发的变更为 None。
/// 变更边界在此负责构建并落库审计记录；审计写入失败只记日志，
/// 不影响业务变更本身。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学生管理方法
    // 创建学生
    async fn create_student(
        &self,
        student: CreateStudentRequest,
        actor: Option<i64>,
    ) -> Result<Student>;
    // 通过ID获取学生信息
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 更新学生信息
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        actor: Option<i64>,
    ) -> Result<Option<Student>>;
    // 软删除学生
    async fn delete_student(&self, id: i64, actor: Option<i64>) -> Result<bool>;
    // 恢复已软删除的学生
    async fn restore_student(&self, id: i64, actor: Option<i64>) -> Result<bool>;

    /// 教职工管理方法
    // 创建教职工
    async fn create_employee(
        &self,
        employee: CreateEmployeeRequest,
        actor: Option<i64>,
    ) -> Result<Employee>;
    // 通过ID获取教职工信息
    async fn get_employee_by_id(&self, id: i64) -> Result<Option<Employee>>;
    // 更新教职工信息
    async fn update_employee(
        &self,
        id: i64,
        update: UpdateEmployeeRequest,
        actor: Option<i64>,
    ) -> Result<Option<Employee>>;
    // 软删除教职工
    async fn delete_employee(&self, id: i64, actor: Option<i64>) -> Result<bool>;
    // 恢复已软删除的教职工
    async fn restore_employee(&self, id: i64, actor: Option<i64>) -> Result<bool>;

    /// 学生备注管理方法
    // 创建备注
    async fn create_student_note(
        &self,
        note: CreateStudentNoteRequest,
        actor: Option<i64>,
    ) -> Result<StudentNote>;
    // 通过ID获取备注
    async fn get_student_note_by_id(&self, id: i64) -> Result<Option<StudentNote>>;
    // 更新备注
    async fn update_student_note(
        &self,
        id: i64,
        update: UpdateStudentNoteRequest,
        actor: Option<i64>,
    ) -> Result<Option<StudentNote>>;
    // 软删除备注
    async fn delete_student_note(&self, id: i64, actor: Option<i64>) -> Result<bool>;
    // 恢复已软删除的备注
    async fn restore_student_note(&self, id: i64, actor: Option<i64>) -> Result<bool>;

    /// 选课管理方法
    // 创建选课记录
    async fn create_enrollment(
        &self,
        enrollment: CreateEnrollmentRequest,
        actor: Option<i64>,
    ) -> Result<Enrollment>;
    // 通过ID获取选课记录
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    // 更新选课记录的业务字段
    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
        actor: Option<i64>,
    ) -> Result<Option<Enrollment>>;
    // 列出班级的选课记录，可按状态筛选
    async fn list_enrollments_by_class(
        &self,
        class_id: i64,
        status: Option<EnrollmentStatus>,
    ) -> Result<Vec<Enrollment>>;
    // 写回成绩聚合服务计算出的派生字段（不产生审计记录）
    async fn write_enrollment_computed_grade(
        &self,
        id: i64,
        weighted_average: f64,
        final_letter_grade: Option<String>,
        grade_points: Option<f64>,
    ) -> Result<()>;
    // 取某条选课记录的全部成绩，连同考核项与分类信息
    async fn list_graded_assessments(&self, enrollment_id: i64) -> Result<Vec<GradedAssessment>>;
    // 取某口径下的 GPA 聚合输入（绩点 × 学分）
    async fn list_gpa_components(
        &self,
        scope: GpaScope,
    ) -> Result<Vec<crate::models::grading::entities::GpaComponent>>;

    /// 成绩管理方法
    // 录入成绩
    async fn create_grade(&self, grade: CreateGradeRequest, actor: Option<i64>) -> Result<Grade>;
    // 通过ID获取成绩
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    // 更新成绩
    async fn update_grade(
        &self,
        id: i64,
        update: UpdateGradeRequest,
        actor: Option<i64>,
    ) -> Result<Option<Grade>>;
    // 删除成绩
    async fn delete_grade(&self, id: i64, actor: Option<i64>) -> Result<bool>;

    /// 评分等级制管理方法
    // 创建评分等级制（连同各等级）
    async fn create_grading_scale(&self, scale: CreateGradingScaleRequest) -> Result<GradingScale>;
    // 通过ID获取评分等级制
    async fn get_grading_scale_by_id(&self, id: i64) -> Result<Option<GradingScale>>;
    // 列出全部评分等级制
    async fn list_grading_scales(&self) -> Result<Vec<GradingScale>>;
    // 获取当前默认评分等级制
    async fn get_default_grading_scale(&self) -> Result<Option<GradingScale>>;
    // 将指定等级制设为唯一默认（事务内先清后设）
    async fn set_default_grading_scale(&self, id: i64) -> Result<bool>;

    /// 班级查询方法
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 列出全部班级ID（批量重算用）
    async fn list_class_ids(&self) -> Result<Vec<i64>>;

    /// 审计日志方法
    // 追加一条审计记录
    async fn insert_audit_log(
        &self,
        record: AuditRecord,
    ) -> Result<crate::models::audit::entities::AuditLog>;
    // 分页查询审计日志
    async fn list_audit_logs_with_pagination(
        &self,
        query: AuditLogQuery,
    ) -> Result<AuditLogListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
