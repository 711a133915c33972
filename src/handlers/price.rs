use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use crate::entities::{price_change_history, prelude::*, prices};
use crate::error::ApiError;
use crate::handlers::{product::find_product, JsonBody};
use crate::models::price::{
    CategoryAverageQuery, CategoryAverageResponse, CreatePriceRequest, PriceHistoryResponse,
    PriceResponse,
};
use crate::services::averages;
use crate::services::category_service::find_category_by_name;
use crate::services::pricing;
use crate::services::timeline::PriceInterval;
use crate::AppState;

/// POST /prices
///
/// Insert a price interval into the product's timeline. Overlapping intervals
/// are trimmed, split or absorbed; every interval removed on the way is kept in
/// the price change history.
///
/// # Response
/// - 201: the stored interval (possibly wider than requested)
/// - 400: field errors, including an unknown product
pub async fn create_price(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreatePriceRequest>,
) -> Result<(StatusCode, Json<PriceResponse>), ApiError> {
    let proposal = payload.validate()?;
    let saved = pricing::set_price(&state.db, &proposal).await?;

    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// GET /prices/average-by-category
///
/// Plain mean of the prices of every interval of the category's products that
/// shares at least one day with `[start_date, end_date]`. 0.00 when none does.
pub async fn get_average_by_category(
    State(state): State<AppState>,
    Query(query): Query<CategoryAverageQuery>,
) -> Result<Json<CategoryAverageResponse>, ApiError> {
    let (name, start_date, end_date) = query.validate()?;

    let category = find_category_by_name(&state.db, &name)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    let average_price =
        averages::category_average(&state.db, category.id, start_date, end_date).await?;

    info!(
        category = %category.name,
        %start_date,
        %end_date,
        %average_price,
        "Category average price computed"
    );

    Ok(Json(CategoryAverageResponse {
        category: category.name,
        start_date,
        end_date,
        average_price,
    }))
}

/// GET /products/{id}/prices
pub async fn list_product_prices(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<PriceResponse>>, ApiError> {
    let product = find_product(&state, id).await?;

    let intervals = Prices::find()
        .filter(prices::Column::ProductId.eq(product.id))
        .order_by_asc(prices::Column::StartDate)
        .all(&state.db)
        .await?;

    Ok(Json(
        intervals
            .into_iter()
            .map(|model| PriceResponse::from(PriceInterval::from(model)))
            .collect(),
    ))
}

/// GET /products/{id}/price-history
///
/// Intervals removed from the product's timeline, newest first.
pub async fn list_price_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<PriceHistoryResponse>>, ApiError> {
    let product = find_product(&state, id).await?;

    let history = PriceChangeHistory::find()
        .filter(price_change_history::Column::ProductId.eq(product.id))
        .order_by_desc(price_change_history::Column::ChangedAt)
        .order_by_desc(price_change_history::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(history.into_iter().map(PriceHistoryResponse::from).collect()))
}
