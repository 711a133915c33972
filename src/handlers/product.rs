use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Order, PaginatorTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::{prelude::*, products};
use crate::error::{ApiError, FieldErrors};
use crate::handlers::JsonBody;
use crate::models::pagination::{Page, PageQuery, PAGE_SIZE};
use crate::models::price::{PeriodAverageResponse, ProductAverageQuery};
use crate::models::product::{ProductFields, ProductRequest, ProductResponse};
use crate::services::averages;
use crate::services::category_service::{category_names, find_category_by_name, sku_taken};
use crate::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<ProductResponse>>, ApiError> {
    let number = page.number()?;

    let paginator = Products::find()
        .order_by(products::Column::Id, Order::Asc)
        .paginate(&state.db, PAGE_SIZE);
    let count = paginator.num_items().await?;
    let rows = paginator.fetch_page(number - 1).await?;

    let names = category_names(&state.db, rows.iter().map(|p| p.category_id).collect()).await?;
    let results = rows
        .into_iter()
        .map(|product| {
            let category = names.get(&product.category_id).cloned().unwrap_or_default();
            ProductResponse::new(product, category)
        })
        .collect();

    Ok(Json(Page::new(number, count, results)?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = find_product(&state, id).await?;
    Ok(Json(render(&state, product).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let fields = payload.validate(false)?;
    let (category_id, sku) = check_references(&state, &fields, None).await?;

    let product = products::ActiveModel {
        name: Set(fields.name.unwrap_or_default()),
        category_id: Set(category_id.unwrap_or_default()),
        sku: Set(sku.unwrap_or_default()),
        description: Set(fields.description),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(product_id = product.id, sku = %product.sku, "Product created");

    Ok((StatusCode::CREATED, Json(render(&state, product).await?)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    save_product(state, id, payload, false).await
}

pub async fn patch_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    save_product(state, id, payload, true).await
}

async fn save_product(
    state: AppState,
    id: i32,
    payload: ProductRequest,
    partial: bool,
) -> Result<Json<ProductResponse>, ApiError> {
    let existing = find_product(&state, id).await?;
    let fields = payload.validate(partial)?;
    let (category_id, sku) = check_references(&state, &fields, Some(id)).await?;

    let mut active: products::ActiveModel = existing.into();
    if let Some(name) = fields.name {
        active.name = Set(name);
    }
    if let Some(category_id) = category_id {
        active.category_id = Set(category_id);
    }
    if let Some(sku) = sku {
        active.sku = Set(sku);
    }
    if !partial || fields.description.is_some() {
        active.description = Set(fields.description);
    }
    let product = active.update(&state.db).await?;

    Ok(Json(render(&state, product).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = Products::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Product"));
    }

    info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /products/{id}/average-price
///
/// Average price of the product's intervals intersecting the range, one entry
/// per week or month of interval start date.
///
/// # Response
/// - 200: list of `{period, average_price}` ordered by period
/// - 400: missing/invalid dates, `start_date > end_date` or invalid `group_by`
/// - 404: product not found
pub async fn get_average_price(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ProductAverageQuery>,
) -> Result<Json<Vec<PeriodAverageResponse>>, ApiError> {
    let (start_date, end_date, group_by) = query.validate()?;
    let product = find_product(&state, id).await?;

    let averages =
        averages::product_averages(&state.db, product.id, start_date, end_date, group_by).await?;

    info!(
        product_id = product.id,
        group_by = group_by.as_str(),
        periods = averages.len(),
        "Product average price computed"
    );

    Ok(Json(averages.into_iter().map(PeriodAverageResponse::from).collect()))
}

pub(crate) async fn find_product(state: &AppState, id: i32) -> Result<products::Model, ApiError> {
    Products::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))
}

async fn render(state: &AppState, product: products::Model) -> Result<ProductResponse, ApiError> {
    let category = Categories::find_by_id(product.category_id)
        .one(&state.db)
        .await?
        .map(|category| category.name)
        .unwrap_or_default();

    Ok(ProductResponse::new(product, category))
}

/// Resolve the category name and check sku uniqueness
async fn check_references(
    state: &AppState,
    fields: &ProductFields,
    except_id: Option<i32>,
) -> Result<(Option<i32>, Option<String>), ApiError> {
    let mut errors = FieldErrors::new();

    let category_id = match &fields.category {
        None => None,
        Some(name) => match find_category_by_name(&state.db, name).await? {
            Some(category) => Some(category.id),
            None => {
                errors.add("category", format!("Object with name={} does not exist.", name));
                None
            }
        },
    };

    if let Some(sku) = &fields.sku {
        if sku_taken(&state.db, sku, except_id).await? {
            errors.add("sku", "product with this sku already exists.");
        }
    }

    errors.into_result((category_id, fields.sku.clone()))
        .map_err(ApiError::from)
}
