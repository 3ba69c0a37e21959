use serde::Deserialize;
use ts_rs::TS;

/// 创建成绩请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRequest {
    pub enrollment_id: i64,
    pub assessment_id: i64,
    pub score: f64,
    #[serde(default)]
    pub is_late: bool,
    pub late_penalty: Option<f64>,
    pub comment: Option<String>,
}

/// 更新成绩请求
///
/// late_penalty 为双层 Option：外层缺省表示保持原值，
/// 显式 null 表示清空折减。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    pub score: Option<f64>,
    pub is_late: Option<bool>,
    #[serde(default)]
    pub late_penalty: Option<Option<f64>>,
    pub comment: Option<String>,
}
