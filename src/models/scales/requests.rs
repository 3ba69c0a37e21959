use serde::Deserialize;
use ts_rs::TS;

/// 创建评分等级制请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/scale.ts")]
pub struct CreateGradingScaleRequest {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    pub levels: Vec<GradeLevelInput>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/scale.ts")]
pub struct GradeLevelInput {
    pub letter: String,
    pub min_percentage: f64,
    pub gpa_points: f64,
}
