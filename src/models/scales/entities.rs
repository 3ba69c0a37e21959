use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评分等级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/scale.ts")]
pub struct GradeLevel {
    pub letter: String,
    pub min_percentage: f64,
    pub gpa_points: f64,
}

// 评分等级制
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/scale.ts")]
pub struct GradingScale {
    pub id: i64,
    pub name: String,
    pub is_default: bool,
    pub levels: Vec<GradeLevel>,
}

impl GradingScale {
    /// 按降序阶梯匹配百分比对应的等级
    ///
    /// 取 min_percentage 不超过该百分比的最高档。min_percentage 相同时
    /// gpa_points 较高的一档优先（确定性的并列裁定规则）。
    pub fn resolve(&self, percentage: f64) -> Option<&GradeLevel> {
        let mut levels: Vec<&GradeLevel> = self.levels.iter().collect();
        levels.sort_by(|a, b| {
            b.min_percentage
                .partial_cmp(&a.min_percentage)
                .unwrap_or(Ordering::Equal)
                .then(
                    b.gpa_points
                        .partial_cmp(&a.gpa_points)
                        .unwrap_or(Ordering::Equal),
                )
        });
        levels
            .into_iter()
            .find(|level| level.min_percentage <= percentage)
    }

    /// 百分比对应的字母等级
    pub fn get_letter_grade(&self, percentage: f64) -> Option<&str> {
        self.resolve(percentage).map(|level| level.letter.as_str())
    }

    /// 字母等级对应的绩点
    pub fn get_gpa_points(&self, letter: &str) -> Option<f64> {
        self.levels
            .iter()
            .find(|level| level.letter == letter)
            .map(|level| level.gpa_points)
    }
}
