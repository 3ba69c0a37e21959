//! 分类加权平均计算
//!
//! 先按分类算百分比，再按分类权重合成总评。这种"先分类后合成"的顺序
//! 容忍各分类权重之和不为 1.0——分母用实际观察到的权重总和归一化，
//! 而不是假定固定的权重方案。

use std::collections::HashMap;

use crate::models::grading::entities::GradedAssessment;

/// 保留两位小数
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 计算一条选课记录的加权平均分，结果在 [0, 100] 区间内
///
/// 常规成绩按分类累计 earned/possible；加分项逐条累加
/// `(adjusted/max) × (考核项权重 ?? 分类权重) × 100`，只加成、
/// 不进入加权分母。没有任何常规成绩时结果即加分累计值本身。
pub fn compute_weighted_average(rows: &[GradedAssessment]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }

    // 分类 id → (earned, possible, weight)
    let mut categories: HashMap<i64, (f64, f64, f64)> = HashMap::new();
    let mut extra_credit = 0.0;

    for row in rows {
        if row.is_extra_credit {
            if row.max_score > 0.0 {
                let weight = row.assessment_weight.unwrap_or(row.category_weight);
                extra_credit += row.adjusted_score / row.max_score * weight * 100.0;
            }
        } else {
            let entry = categories
                .entry(row.category_id)
                .or_insert((0.0, 0.0, row.category_weight));
            entry.0 += row.adjusted_score;
            entry.1 += row.max_score;
        }
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (earned, possible, weight) in categories.into_values() {
        if possible > 0.0 {
            weighted_sum += earned / possible * 100.0 * weight;
            total_weight += weight;
        }
    }

    // 没有常规成绩时退化为加分累计值，不存在可供合成的基础平均分
    let result = if total_weight > 0.0 {
        weighted_sum / total_weight + extra_credit
    } else {
        extra_credit
    };

    round2(result.clamp(0.0, 100.0))
}
