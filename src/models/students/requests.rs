use serde::Deserialize;
use ts_rs::TS;

use super::entities::StudentStatus;

/// 创建学生请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub student_number: String,
    pub email: Option<String>,
    pub cohort_id: Option<i64>,
    pub photo: Option<String>,
}

/// 更新学生请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub cohort_id: Option<i64>,
    pub photo: Option<String>,
    pub status: Option<StudentStatus>,
}
