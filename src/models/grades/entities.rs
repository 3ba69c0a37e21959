use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成绩实体
//
// adjusted_score 在写入时派生一次：迟交时 score × (1 - late_penalty/100)，
// 否则等于 score。聚合计算只读取该字段，不再重算。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub enrollment_id: i64,
    pub assessment_id: i64,
    pub score: f64,
    pub is_late: bool,
    pub late_penalty: Option<f64>,
    pub adjusted_score: f64,
    pub comment: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Grade {
    /// 审计日志中的主体标签
    pub fn subject_label(&self) -> String {
        format!(
            "grade for enrollment {} on assessment {}",
            self.enrollment_id, self.assessment_id
        )
    }
}

/// 迟交折减后的得分
///
/// 仅在成绩写入时调用一次，之后各处读取 adjusted_score 字段。
pub fn adjusted_score(score: f64, is_late: bool, late_penalty: Option<f64>) -> f64 {
    match (is_late, late_penalty) {
        (true, Some(penalty)) => score * (1.0 - penalty.clamp(0.0, 100.0) / 100.0),
        _ => score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjusted_score_on_time() {
        assert_eq!(adjusted_score(85.0, false, None), 85.0);
        assert_eq!(adjusted_score(85.0, false, Some(10.0)), 85.0);
    }

    #[test]
    fn test_adjusted_score_late_penalty() {
        assert_eq!(adjusted_score(100.0, true, Some(10.0)), 90.0);
        assert_eq!(adjusted_score(80.0, true, Some(25.0)), 60.0);
    }

    #[test]
    fn test_adjusted_score_late_without_penalty() {
        assert_eq!(adjusted_score(70.0, true, None), 70.0);
    }

    #[test]
    fn test_adjusted_score_penalty_clamped() {
        assert_eq!(adjusted_score(50.0, true, Some(150.0)), 0.0);
    }
}
