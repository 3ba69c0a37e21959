//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod audit_logs;
mod classes;
mod employees;
mod enrollments;
mod grades;
mod grading_scales;
mod student_notes;
mod students;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{Result, SRSystemError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SRSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SRSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SRSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SRSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 内存 SQLite 实例（测试专用）
    ///
    /// 单连接池：内存数据库按连接隔离，多连接会各自看到空库。
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).sqlx_logging(false);

        let db = Database::connect(opt).await.expect("连接内存数据库失败");
        Migrator::up(&db, None).await.expect("内存数据库迁移失败");

        Self { db }
    }
}

// Storage trait 实现
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
    grading::entities::{GpaComponent, GpaScope, GradedAssessment},
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
use crate::services::audit::AuditRecord;
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学生模块
    async fn create_student(
        &self,
        student: CreateStudentRequest,
        actor: Option<i64>,
    ) -> Result<Student> {
        self.create_student_impl(student, actor).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        actor: Option<i64>,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update, actor).await
    }

    async fn delete_student(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        self.delete_student_impl(id, actor).await
    }

    async fn restore_student(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        self.restore_student_impl(id, actor).await
    }

    // 教职工模块
    async fn create_employee(
        &self,
        employee: CreateEmployeeRequest,
        actor: Option<i64>,
    ) -> Result<Employee> {
        self.create_employee_impl(employee, actor).await
    }

    async fn get_employee_by_id(&self, id: i64) -> Result<Option<Employee>> {
        self.get_employee_by_id_impl(id).await
    }

    async fn update_employee(
        &self,
        id: i64,
        update: UpdateEmployeeRequest,
        actor: Option<i64>,
    ) -> Result<Option<Employee>> {
        self.update_employee_impl(id, update, actor).await
    }

    async fn delete_employee(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        self.delete_employee_impl(id, actor).await
    }

    async fn restore_employee(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        self.restore_employee_impl(id, actor).await
    }

    // 学生备注模块
    async fn create_student_note(
        &self,
        note: CreateStudentNoteRequest,
        actor: Option<i64>,
    ) -> Result<StudentNote> {
        self.create_student_note_impl(note, actor).await
    }

    async fn get_student_note_by_id(&self, id: i64) -> Result<Option<StudentNote>> {
        self.get_student_note_by_id_impl(id).await
    }

    async fn update_student_note(
        &self,
        id: i64,
        update: UpdateStudentNoteRequest,
        actor: Option<i64>,
    ) -> Result<Option<StudentNote>> {
        self.update_student_note_impl(id, update, actor).await
    }

    async fn delete_student_note(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        self.delete_student_note_impl(id, actor).await
    }

    async fn restore_student_note(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        self.restore_student_note_impl(id, actor).await
    }

    // 选课模块
    async fn create_enrollment(
        &self,
        enrollment: CreateEnrollmentRequest,
        actor: Option<i64>,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment, actor).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
        actor: Option<i64>,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, update, actor).await
    }

    async fn list_enrollments_by_class(
        &self,
        class_id: i64,
        status: Option<EnrollmentStatus>,
    ) -> Result<Vec<Enrollment>> {
        self.list_enrollments_by_class_impl(class_id, status).await
    }

    async fn write_enrollment_computed_grade(
        &self,
        id: i64,
        weighted_average: f64,
        final_letter_grade: Option<String>,
        grade_points: Option<f64>,
    ) -> Result<()> {
        self.write_enrollment_computed_grade_impl(id, weighted_average, final_letter_grade, grade_points)
            .await
    }

    async fn list_graded_assessments(&self, enrollment_id: i64) -> Result<Vec<GradedAssessment>> {
        self.list_graded_assessments_impl(enrollment_id).await
    }

    async fn list_gpa_components(&self, scope: GpaScope) -> Result<Vec<GpaComponent>> {
        self.list_gpa_components_impl(scope).await
    }

    // 成绩模块
    async fn create_grade(&self, grade: CreateGradeRequest, actor: Option<i64>) -> Result<Grade> {
        self.create_grade_impl(grade, actor).await
    }

    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn update_grade(
        &self,
        id: i64,
        update: UpdateGradeRequest,
        actor: Option<i64>,
    ) -> Result<Option<Grade>> {
        self.update_grade_impl(id, update, actor).await
    }

    async fn delete_grade(&self, id: i64, actor: Option<i64>) -> Result<bool> {
        self.delete_grade_impl(id, actor).await
    }

    // 评分等级制模块
    async fn create_grading_scale(&self, scale: CreateGradingScaleRequest) -> Result<GradingScale> {
        self.create_grading_scale_impl(scale).await
    }

    async fn get_grading_scale_by_id(&self, id: i64) -> Result<Option<GradingScale>> {
        self.get_grading_scale_by_id_impl(id).await
    }

    async fn list_grading_scales(&self) -> Result<Vec<GradingScale>> {
        self.list_grading_scales_impl().await
    }

    async fn get_default_grading_scale(&self) -> Result<Option<GradingScale>> {
        self.get_default_grading_scale_impl().await
    }

    async fn set_default_grading_scale(&self, id: i64) -> Result<bool> {
        self.set_default_grading_scale_impl(id).await
    }

    // 班级模块
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_class_ids(&self) -> Result<Vec<i64>> {
        self.list_class_ids_impl().await
    }

    // 审计日志模块
    async fn insert_audit_log(
        &self,
        record: AuditRecord,
    ) -> Result<crate::models::audit::entities::AuditLog> {
        self.insert_audit_log_impl(record).await
    }

    async fn list_audit_logs_with_pagination(
        &self,
        query: AuditLogQuery,
    ) -> Result<AuditLogListResponse> {
        self.list_audit_logs_with_pagination_impl(query).await
    }
}
