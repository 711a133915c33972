use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::entities::{categories, prelude::*, products};

/// Look up a category by its unique name
pub async fn find_category_by_name<C>(
    db: &C,
    name: &str,
) -> Result<Option<categories::Model>, DbErr>
where
    C: ConnectionTrait,
{
    Categories::find()
        .filter(categories::Column::Name.eq(name))
        .one(db)
        .await
}

/// Category names keyed by id, for rendering products
pub async fn category_names<C>(db: &C, ids: Vec<i32>) -> Result<HashMap<i32, String>, DbErr>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let names = Categories::find()
        .filter(categories::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect();

    Ok(names)
}

/// Whether another product already uses `sku`
pub async fn sku_taken<C>(db: &C, sku: &str, except_id: Option<i32>) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = Products::find().filter(products::Column::Sku.eq(sku));
    if let Some(id) = except_id {
        query = query.filter(products::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}
