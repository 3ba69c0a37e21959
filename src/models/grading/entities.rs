use serde::{Deserialize, Serialize};

// 聚合计算的输入行：一条成绩连同其考核项与分类信息
//
// 由 Storage 层联表查询组装，聚合本身是纯计算。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedAssessment {
    pub category_id: i64,
    pub category_weight: f64,
    pub adjusted_score: f64,
    pub max_score: f64,
    pub is_extra_credit: bool,
    // 加分项专用权重，NULL 时回退到分类权重
    pub assessment_weight: Option<f64>,
}

// GPA 统计范围：三种口径共用同一聚合算法，仅筛选谓词不同
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpaScope {
    /// 某学生某学期
    Term { student_id: i64, term_id: i64 },
    /// 某学生全部历史
    Cumulative { student_id: i64 },
    /// 某届别全体学生
    Cohort { cohort_id: i64 },
}

// GPA 聚合的输入行：绩点与学分权重
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GpaComponent {
    pub grade_points: f64,
    // 课程学分，NULL 按 1.0 计
    pub credits: Option<f64>,
}

// 班级批量重算结果
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RecomputeOutcome {
    pub processed: usize,
    pub failed: usize,
}
