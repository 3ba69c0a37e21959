//! 评分等级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grading_scale_levels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub scale_id: i64,
    pub letter: String,
    pub min_percentage: f64,
    pub gpa_points: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grading_scales::Entity",
        from = "Column::ScaleId",
        to = "super::grading_scales::Column::Id"
    )]
    Scale,
}

impl Related<super::grading_scales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scale.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
