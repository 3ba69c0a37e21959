use super::SeaOrmStorage;
use crate::entity::classes::{Column, Entity as Classes};
use crate::errors::{Result, SRSystemError};
use crate::models::classes::entities::Class;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};

impl SeaOrmStorage {
    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 列出全部班级 ID，批量重算按此遍历
    pub async fn list_class_ids_impl(&self) -> Result<Vec<i64>> {
        let ids: Vec<i64> = Classes::find()
            .select_only()
            .column(Column::Id)
            .order_by_asc(Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SRSystemError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ids)
    }
}
