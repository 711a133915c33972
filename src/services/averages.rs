//! Average price queries over price timelines
//!
//! An interval takes part in an average when it shares at least one day with
//! the requested range. Every such interval counts once, whatever its length.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{prelude::*, prices, products};

/// Period used to bucket intervals by their start date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Week,
    Month,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Week => "week",
            GroupBy::Month => "month",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "week" => Some(GroupBy::Week),
            "month" => Some(GroupBy::Month),
            _ => None,
        }
    }

    /// First day of the period containing `date` (weeks start on Monday)
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            GroupBy::Week => {
                date - Days::new(u64::from(date.weekday().num_days_from_monday()))
            }
            GroupBy::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodAverage {
    pub period: NaiveDate,
    pub average_price: Decimal,
}

/// Arithmetic mean rounded to cents, zero for an empty input
pub fn average(prices: impl IntoIterator<Item = Decimal>) -> Decimal {
    let (sum, count) = prices
        .into_iter()
        .fold((Decimal::ZERO, 0u32), |(sum, count), price| (sum + price, count + 1));

    if count == 0 {
        return round_price(Decimal::ZERO);
    }
    round_price(sum / Decimal::from(count))
}

/// Round half to even to two decimal places, always keeping two places
pub fn round_price(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded
}

/// Average per period, ordered by period
pub fn group_averages(rows: &[prices::Model], group_by: GroupBy) -> Vec<PeriodAverage> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Decimal>> = BTreeMap::new();
    for row in rows {
        buckets
            .entry(group_by.period_start(row.start_date))
            .or_default()
            .push(row.price);
    }

    buckets
        .into_iter()
        .map(|(period, prices)| PeriodAverage {
            period,
            average_price: average(prices),
        })
        .collect()
}

/// Intervals of the given products that share a day with `[start_date, end_date]`
pub async fn intersecting_prices<C>(
    db: &C,
    product_ids: Vec<i32>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<prices::Model>, DbErr>
where
    C: ConnectionTrait,
{
    if product_ids.is_empty() {
        return Ok(vec![]);
    }

    Prices::find()
        .filter(prices::Column::ProductId.is_in(product_ids))
        .filter(prices::Column::StartDate.lte(end_date))
        .filter(
            Condition::any()
                .add(prices::Column::EndDate.gte(start_date))
                .add(prices::Column::EndDate.is_null()),
        )
        .order_by_asc(prices::Column::StartDate)
        .all(db)
        .await
}

/// Average price of all intervals of products in `category_id` within the range
pub async fn category_average<C>(
    db: &C,
    category_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Decimal, DbErr>
where
    C: ConnectionTrait,
{
    let product_ids: Vec<i32> = Products::find()
        .filter(products::Column::CategoryId.eq(category_id))
        .all(db)
        .await?
        .into_iter()
        .map(|product| product.id)
        .collect();

    let rows = intersecting_prices(db, product_ids, start_date, end_date).await?;

    tracing::debug!(
        category_id,
        intervals = rows.len(),
        "Averaging category prices"
    );

    Ok(average(rows.into_iter().map(|row| row.price)))
}

/// Average price of one product within the range, grouped by period
pub async fn product_averages<C>(
    db: &C,
    product_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    group_by: GroupBy,
) -> Result<Vec<PeriodAverage>, DbErr>
where
    C: ConnectionTrait,
{
    let rows = intersecting_prices(db, vec![product_id], start_date, end_date).await?;
    Ok(group_averages(&rows, group_by))
}
