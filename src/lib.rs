// src/lib.rs

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use handlers::{category, price, product};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub mod entities {
    pub mod prelude;
    pub mod categories;
    pub mod products;
    pub mod prices;
    pub mod price_change_history;
}

pub mod services {
    pub mod timeline;
    pub mod price_store;
    pub mod pricing;
    pub mod averages;
    pub mod category_service;
}

pub mod config;
pub mod error;
pub mod models;
pub mod handlers;

/// All HTTP routes
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/prices", post(price::create_price))
        .route("/prices/average-by-category", get(price::get_average_by_category))
        .route(
            "/categories",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/categories/{id}",
            get(category::get_category)
                .put(category::update_category)
                .patch(category::patch_category)
                .delete(category::delete_category),
        )
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/{id}",
            get(product::get_product)
                .put(product::update_product)
                .patch(product::patch_product)
                .delete(product::delete_product),
        )
        .route("/products/{id}/average-price", get(product::get_average_price))
        .route("/products/{id}/prices", get(price::list_product_prices))
        .route("/products/{id}/price-history", get(price::list_price_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
