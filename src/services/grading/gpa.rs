//! GPA 聚合
//!
//! 学期、累计、届别三种口径共用同一算法，差异只在 Storage 层的
//! 筛选谓词（GpaScope）。

use super::average::round2;
use crate::models::grading::entities::GpaComponent;

/// 按学分加权的 GPA：Σ(绩点×学分) / Σ(学分)
///
/// 学分为 NULL 时按 1.0 计；集合为空或学分总和为 0 时返回 0.0，
/// 这是"尚无数据"的合法状态而非错误。
pub fn weighted_gpa(components: &[GpaComponent]) -> f64 {
    let mut quality_points = 0.0;
    let mut total_credits = 0.0;

    for component in components {
        let credits = component.credits.unwrap_or(1.0);
        quality_points += component.grade_points * credits;
        total_credits += credits;
    }

    if total_credits > 0.0 {
        round2(quality_points / total_credits)
    } else {
        0.0
    }
}
