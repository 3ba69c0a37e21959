use serde::Deserialize;
use ts_rs::TS;

use super::entities::NoteVisibility;

/// 创建学生备注请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct CreateStudentNoteRequest {
    pub student_id: i64,
    pub body: String,
    #[serde(default)]
    pub visibility: NoteVisibility,
}

/// 更新学生备注请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct UpdateStudentNoteRequest {
    pub body: Option<String>,
    pub visibility: Option<NoteVisibility>,
}
