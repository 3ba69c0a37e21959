//! 成绩聚合服务
//!
//! 从 Storage 读取选课记录的全部成绩（连同考核项与分类），计算加权
//! 平均分，按当前默认评分等级制解析字母等级与绩点，再把派生字段写回
//! 选课记录。GPA 按学期 / 累计 / 届别三种口径聚合。

pub mod average;
mod commit;
pub mod gpa;

pub use average::compute_weighted_average;
pub use gpa::weighted_gpa;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::grading::entities::GpaScope;
use crate::storage::Storage;

/// 成绩聚合服务
#[derive(Clone)]
pub struct GradingService {
    storage: Arc<dyn Storage>,
}

impl GradingService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// 某学生某学期的 GPA
    pub async fn term_gpa(&self, student_id: i64, term_id: i64) -> Result<f64> {
        let components = self
            .storage
            .list_gpa_components(GpaScope::Term {
                student_id,
                term_id,
            })
            .await?;
        Ok(gpa::weighted_gpa(&components))
    }

    /// 某学生全部历史的累计 GPA
    pub async fn cumulative_gpa(&self, student_id: i64) -> Result<f64> {
        let components = self
            .storage
            .list_gpa_components(GpaScope::Cumulative { student_id })
            .await?;
        Ok(gpa::weighted_gpa(&components))
    }

    /// 某届别全体学生的 GPA
    pub async fn cohort_gpa(&self, cohort_id: i64) -> Result<f64> {
        let components = self
            .storage
            .list_gpa_components(GpaScope::Cohort { cohort_id })
            .await?;
        Ok(gpa::weighted_gpa(&components))
    }
}
