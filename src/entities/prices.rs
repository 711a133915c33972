//! `SeaORM` Entity for price validity intervals
//!
//! One row per interval of a product's price timeline. Rows of the same
//! product never overlap; a NULL `end_date` marks the open-ended interval.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    /// First day the price applies (inclusive)
    pub start_date: Date,
    /// Last day the price applies (inclusive), `None` = valid indefinitely
    pub end_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
