use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use crate::entities::{categories, prelude::*};
use crate::error::ApiError;
use crate::handlers::JsonBody;
use crate::models::category::{CategoryRequest, CategoryResponse};
use crate::models::pagination::{Page, PageQuery, PAGE_SIZE};
use crate::AppState;

pub async fn list_categories(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<CategoryResponse>>, ApiError> {
    let number = page.number()?;

    let paginator = Categories::find()
        .order_by(categories::Column::Id, Order::Asc)
        .paginate(&state.db, PAGE_SIZE);
    let count = paginator.num_items().await?;
    let results = paginator
        .fetch_page(number - 1)
        .await?
        .into_iter()
        .map(CategoryResponse::from)
        .collect();

    Ok(Json(Page::new(number, count, results)?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = Categories::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    Ok(Json(category.into()))
}

pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let Some(name) = payload.validate(false)? else {
        return Err(ApiError::field("name", "This field is required."));
    };
    ensure_name_free(&state, &name, None).await?;

    let category = categories::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(category_id = category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<CategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    save_category(state, id, payload, false).await
}

pub async fn patch_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<CategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    save_category(state, id, payload, true).await
}

async fn save_category(
    state: AppState,
    id: i32,
    payload: CategoryRequest,
    partial: bool,
) -> Result<Json<CategoryResponse>, ApiError> {
    let existing = Categories::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    let Some(name) = payload.validate(partial)? else {
        return Ok(Json(existing.into()));
    };
    ensure_name_free(&state, &name, Some(id)).await?;

    let mut active: categories::ActiveModel = existing.into();
    active.name = Set(name);
    let category = active.update(&state.db).await?;

    Ok(Json(category.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = Categories::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("Category"));
    }

    info!(category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_name_free(state: &AppState, name: &str, except_id: Option<i32>) -> Result<(), ApiError> {
    let mut query = Categories::find().filter(categories::Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(categories::Column::Id.ne(id));
    }

    if query.one(&state.db).await?.is_some() {
        return Err(ApiError::field("name", "category with this name already exists."));
    }
    Ok(())
}
