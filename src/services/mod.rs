//! 业务逻辑层
//!
//! - `audit`: 变更审计（字段策略 + 快照差异 + 审计记录构建）
//! - `grading`: 成绩聚合（加权平均、等级解析、GPA 统计）

pub mod audit;
pub mod grading;
