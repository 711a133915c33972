//! Price request/response models
//!
//! Requests keep every field optional and untyped enough that malformed input
//! is reported per field instead of being rejected by the extractor.

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::price_change_history;
use crate::error::{FieldErrors, NON_FIELD_ERRORS};
use crate::models::validation::{
    decimal_value, digits, optional_json_date, pk_value, required_date, required_json_date,
    required_text, INVALID_DATE, INVALID_NUMBER, REQUIRED,
};
use crate::services::averages::{GroupBy, PeriodAverage};
use crate::services::timeline::PriceInterval;

/// `prices.price` is NUMERIC(10, 2)
pub const PRICE_MAX_DIGITS: u32 = 10;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Body of `POST /prices`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePriceRequest {
    pub product: Option<Value>,
    pub price: Option<Value>,
    pub start_date: Option<Value>,
    pub end_date: Option<Value>,
}

impl CreatePriceRequest {
    pub fn validate(&self) -> Result<PriceInterval, FieldErrors> {
        let mut errors = FieldErrors::new();

        let product_id = match &self.product {
            None => {
                errors.add("product", REQUIRED);
                None
            }
            Some(value) => match pk_value(value) {
                Ok(id) => Some(id),
                Err(message) => {
                    errors.add("product", message);
                    None
                }
            },
        };

        let price = match &self.price {
            None => {
                errors.add("price", REQUIRED);
                None
            }
            Some(value) => validate_price(&mut errors, value),
        };

        let start_date = required_json_date(&mut errors, "start_date", self.start_date.as_ref());
        let end_date = optional_json_date(&mut errors, "end_date", self.end_date.as_ref());

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.add(
                    NON_FIELD_ERRORS,
                    "End date must be after or equal to start date.",
                );
            }
        }

        match (product_id, price, start_date) {
            (Some(product_id), Some(price), Some(start_date)) if errors.is_empty() => {
                Ok(PriceInterval::new(product_id, price, start_date, end_date))
            }
            _ => Err(errors),
        }
    }
}

fn validate_price(errors: &mut FieldErrors, value: &Value) -> Option<Decimal> {
    let Some(price) = decimal_value(value) else {
        errors.add("price", INVALID_NUMBER);
        return None;
    };

    let (total, places) = digits(price);
    if total > PRICE_MAX_DIGITS {
        errors.add(
            "price",
            format!(
                "Ensure that there are no more than {} digits in total.",
                PRICE_MAX_DIGITS
            ),
        );
    } else if places > PRICE_DECIMAL_PLACES {
        errors.add(
            "price",
            format!(
                "Ensure that there are no more than {} decimal places.",
                PRICE_DECIMAL_PLACES
            ),
        );
    } else if total - places > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        errors.add(
            "price",
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES
            ),
        );
    }
    if price < Decimal::ZERO {
        errors.add("price", "Ensure this value is greater than or equal to 0.00.");
    }

    if errors.contains("price") { None } else { Some(price) }
}

/// Stored price interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceResponse {
    pub id: i32,
    pub product: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<PriceInterval> for PriceResponse {
    fn from(interval: PriceInterval) -> Self {
        Self {
            id: interval.id.unwrap_or_default(),
            product: interval.product_id,
            price: interval.price,
            start_date: interval.start_date,
            end_date: interval.end_date,
        }
    }
}

/// One removed interval as kept in the price change history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryResponse {
    pub id: i32,
    pub product: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub old_price: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub changed_at: DateTime<FixedOffset>,
}

impl From<price_change_history::Model> for PriceHistoryResponse {
    fn from(model: price_change_history::Model) -> Self {
        Self {
            id: model.id,
            product: model.product_id,
            old_price: model.old_price,
            start_date: model.start_date,
            end_date: model.end_date,
            changed_at: model.changed_at,
        }
    }
}

/// Query of `GET /prices/average-by-category`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryAverageQuery {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl CategoryAverageQuery {
    pub fn validate(&self) -> Result<(String, NaiveDate, NaiveDate), FieldErrors> {
        let mut errors = FieldErrors::new();

        let category = required_text(&mut errors, "category", self.category.as_deref(), 255);
        let start_date = required_date(&mut errors, "start_date", self.start_date.as_deref());
        let end_date = required_date(&mut errors, "end_date", self.end_date.as_deref());

        match (category, start_date, end_date) {
            (Some(category), Some(start), Some(end)) if errors.is_empty() => {
                check_range(start, end)?;
                Ok((category, start, end))
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAverageResponse {
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
}

/// Query of `GET /products/{id}/average-price`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductAverageQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub group_by: Option<String>,
}

impl ProductAverageQuery {
    pub fn validate(&self) -> Result<(NaiveDate, NaiveDate, GroupBy), FieldErrors> {
        let mut errors = FieldErrors::new();

        let start_date = required_date(&mut errors, "start_date", self.start_date.as_deref());
        let end_date = required_date(&mut errors, "end_date", self.end_date.as_deref());
        let group_by = match self.group_by.as_deref() {
            None => {
                errors.add("group_by", REQUIRED);
                None
            }
            Some(raw) => {
                let parsed = GroupBy::from_str(raw);
                if parsed.is_none() {
                    errors.add("group_by", format!("\"{}\" is not a valid choice.", raw));
                }
                parsed
            }
        };

        match (start_date, end_date, group_by) {
            (Some(start), Some(end), Some(group_by)) if errors.is_empty() => {
                check_range(start, end)?;
                Ok((start, end, group_by))
            }
            _ => Err(errors),
        }
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), FieldErrors> {
    if start > end {
        return Err(FieldErrors::single(
            "start_date",
            "Start date must be before end date.",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodAverageResponse {
    pub period: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
}

impl From<PeriodAverage> for PeriodAverageResponse {
    fn from(average: PeriodAverage) -> Self {
        Self {
            period: average.period,
            average_price: average.average_price,
        }
    }
}
