use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::grading_scale_levels;
use crate::entity::grading_scales::{ActiveModel, Column, Entity as GradingScales, Model};
use crate::errors::{Result, SRSystemError};
use crate::models::scales::{
    entities::{GradeLevel, GradingScale},
    requests::CreateGradingScaleRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建评分等级制（连同各等级）
    ///
    /// 请求标记为默认时，在同一事务内先清除现有默认，保证任何
    /// 时刻最多一个默认等级制。
    pub async fn create_grading_scale_impl(
        &self,
        req: CreateGradingScaleRequest,
    ) -> Result<GradingScale> {
        if req.levels.is_empty() {
            return Err(SRSystemError::validation("评分等级制至少需要一个等级"));
        }

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SRSystemError::database_operation(format!("开启事务失败: {e}")))?;

        if req.is_default {
            GradingScales::update_many()
                .col_expr(Column::IsDefault, sea_orm::sea_query::Expr::value(false))
                .filter(Column::IsDefault.eq(true))
                .exec(&txn)
                .await
                .map_err(|e| {
                    SRSystemError::database_operation(format!("清除现有默认等级制失败: {e}"))
                })?;
        }

        let scale = ActiveModel {
            name: Set(req.name),
            is_default: Set(req.is_default),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SRSystemError::database_operation(format!("创建评分等级制失败: {e}")))?;

        let levels: Vec<grading_scale_levels::ActiveModel> = req
            .levels
            .iter()
            .map(|level| grading_scale_levels::ActiveModel {
                scale_id: Set(scale.id),
                letter: Set(level.letter.clone()),
                min_percentage: Set(level.min_percentage),
                gpa_points: Set(level.gpa_points),
                ..Default::default()
            })
            .collect();

        grading_scale_levels::Entity::insert_many(levels)
            .exec(&txn)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("创建评分等级失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SRSystemError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_grading_scale_by_id_impl(scale.id)
            .await?
            .ok_or_else(|| SRSystemError::database_operation("读取刚创建的等级制失败"))
    }

    /// 通过 ID 获取评分等级制
    pub async fn get_grading_scale_by_id_impl(&self, id: i64) -> Result<Option<GradingScale>> {
        let Some(scale) = GradingScales::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询评分等级制失败: {e}")))?
        else {
            return Ok(None);
        };

        let levels = self.load_scale_levels(id).await?;
        Ok(Some(Self::assemble_scale(scale, levels)))
    }

    /// 列出全部评分等级制
    pub async fn list_grading_scales_impl(&self) -> Result<Vec<GradingScale>> {
        let scales = GradingScales::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询评分等级制列表失败: {e}")))?;

        let all_levels = grading_scale_levels::Entity::find()
            .order_by_desc(grading_scale_levels::Column::MinPercentage)
            .all(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询评分等级列表失败: {e}")))?;

        let mut levels_by_scale: HashMap<i64, Vec<GradeLevel>> = HashMap::new();
        for level in all_levels {
            levels_by_scale
                .entry(level.scale_id)
                .or_default()
                .push(GradeLevel {
                    letter: level.letter,
                    min_percentage: level.min_percentage,
                    gpa_points: level.gpa_points,
                });
        }

        Ok(scales
            .into_iter()
            .map(|scale| {
                let levels = levels_by_scale.remove(&scale.id).unwrap_or_default();
                Self::assemble_scale(scale, levels)
            })
            .collect())
    }

    /// 获取当前默认评分等级制
    pub async fn get_default_grading_scale_impl(&self) -> Result<Option<GradingScale>> {
        let Some(scale) = GradingScales::find()
            .filter(Column::IsDefault.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询默认等级制失败: {e}")))?
        else {
            return Ok(None);
        };

        let levels = self.load_scale_levels(scale.id).await?;
        Ok(Some(Self::assemble_scale(scale, levels)))
    }

    /// 将指定等级制设为唯一默认
    ///
    /// 事务内先清后设，两次 update 之间不存在可观察的中间状态。
    pub async fn set_default_grading_scale_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SRSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let exists = GradingScales::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询评分等级制失败: {e}")))?
            .is_some();
        if !exists {
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        GradingScales::update_many()
            .col_expr(Column::IsDefault, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::IsDefault.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| {
                SRSystemError::database_operation(format!("清除现有默认等级制失败: {e}"))
            })?;

        GradingScales::update_many()
            .col_expr(Column::IsDefault, sea_orm::sea_query::Expr::value(true))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("设置默认等级制失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SRSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    async fn load_scale_levels(&self, scale_id: i64) -> Result<Vec<GradeLevel>> {
        let levels = grading_scale_levels::Entity::find()
            .filter(grading_scale_levels::Column::ScaleId.eq(scale_id))
            .order_by_desc(grading_scale_levels::Column::MinPercentage)
            .all(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询评分等级失败: {e}")))?;

        Ok(levels
            .into_iter()
            .map(|level| GradeLevel {
                letter: level.letter,
                min_percentage: level.min_percentage,
                gpa_points: level.gpa_points,
            })
            .collect())
    }

    fn assemble_scale(scale: Model, levels: Vec<GradeLevel>) -> GradingScale {
        GradingScale {
            id: scale.id,
            name: scale.name,
            is_default: scale.is_default,
            levels,
        }
    }
}
