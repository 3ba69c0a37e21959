use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级实体（某学期开设的某门课程）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    pub course_id: i64,
    pub term_id: i64,
    pub teacher_id: i64,
    pub name: String,
}
