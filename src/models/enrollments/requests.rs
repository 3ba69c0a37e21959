use serde::Deserialize;
use ts_rs::TS;

use super::entities::EnrollmentStatus;

/// 创建选课记录请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub class_id: i64,
    pub cohort_id: Option<i64>,
}

/// 更新选课记录请求（业务字段，派生成绩字段不在此列）
///
/// cohort_id 为双层 Option：外层缺省表示保持原值，
/// 显式 null 表示脱离届别。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct UpdateEnrollmentRequest {
    pub class_id: Option<i64>,
    #[serde(default)]
    pub cohort_id: Option<Option<i64>>,
    pub status: Option<EnrollmentStatus>,
}
