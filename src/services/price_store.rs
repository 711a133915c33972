//! Persistence of product price timelines
//!
//! [`IntervalStore`] is the boundary between the pure resolution engine and the
//! database. The `SeaORM` implementation is meant to be bound to a transaction so
//! that a whole [`Resolution`] commits or rolls back as one unit.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{price_change_history, prelude::*, prices};
use crate::services::timeline::{PriceInterval, Resolution};

impl From<prices::Model> for PriceInterval {
    fn from(model: prices::Model) -> Self {
        Self {
            id: Some(model.id),
            product_id: model.product_id,
            price: model.price,
            start_date: model.start_date,
            end_date: model.end_date,
        }
    }
}

#[async_trait]
pub trait IntervalStore {
    /// All intervals of one product, ordered by start date
    async fn load(&self, product_id: i32) -> Result<Vec<PriceInterval>, DbErr>;

    /// Persist a resolution: removals (each recorded in the price history
    /// first), then remainders, then the final interval, which is returned
    /// with its new identity.
    async fn apply(&self, resolution: &Resolution) -> Result<PriceInterval, DbErr>;
}

pub struct SeaOrmIntervalStore<'a, C> {
    conn: &'a C,
}

impl<'a, C> SeaOrmIntervalStore<'a, C>
where
    C: ConnectionTrait + Sync,
{
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    async fn insert(&self, interval: &PriceInterval) -> Result<PriceInterval, DbErr> {
        let model = prices::ActiveModel {
            product_id: Set(interval.product_id),
            price: Set(interval.price),
            start_date: Set(interval.start_date),
            end_date: Set(interval.end_date),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(model.into())
    }

    async fn remove(
        &self,
        interval: &PriceInterval,
        changed_at: DateTime<FixedOffset>,
    ) -> Result<(), DbErr> {
        let id = interval.id.ok_or_else(|| {
            DbErr::Custom(format!(
                "cannot remove unsaved price interval of product {}",
                interval.product_id
            ))
        })?;

        record_removal(self.conn, interval, changed_at).await?;

        let result = Prices::delete_by_id(id).exec(self.conn).await?;
        if result.rows_affected == 0 {
            // removed by someone else since it was loaded
            return Err(DbErr::RecordNotFound(format!("price interval {}", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl<'a, C> IntervalStore for SeaOrmIntervalStore<'a, C>
where
    C: ConnectionTrait + Sync,
{
    async fn load(&self, product_id: i32) -> Result<Vec<PriceInterval>, DbErr> {
        let rows = Prices::find()
            .filter(prices::Column::ProductId.eq(product_id))
            .order_by(prices::Column::StartDate, Order::Asc)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(PriceInterval::from).collect())
    }

    async fn apply(&self, resolution: &Resolution) -> Result<PriceInterval, DbErr> {
        let changed_at = Utc::now().fixed_offset();

        for interval in &resolution.removed {
            self.remove(interval, changed_at).await?;
        }

        for interval in &resolution.created {
            self.insert(interval).await?;
        }

        self.insert(&resolution.final_interval).await
    }
}

/// Append a history row for an interval about to be removed
pub async fn record_removal<C>(
    conn: &C,
    interval: &PriceInterval,
    changed_at: DateTime<FixedOffset>,
) -> Result<price_change_history::Model, DbErr>
where
    C: ConnectionTrait,
{
    tracing::debug!(
        product_id = interval.product_id,
        price = %interval.price,
        start_date = %interval.start_date,
        end_date = ?interval.end_date,
        "Recording removed price interval"
    );

    price_change_history::ActiveModel {
        product_id: Set(interval.product_id),
        old_price: Set(interval.price),
        start_date: Set(interval.start_date),
        end_date: Set(interval.end_date),
        changed_at: Set(changed_at),
        ..Default::default()
    }
    .insert(conn)
    .await
}
