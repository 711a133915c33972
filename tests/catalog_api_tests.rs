mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_category_crud() {
    let app = TestApp::new().await;

    let id = app.category("Books").await;

    let (status, json) = app.get(&format!("/categories/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"id": id, "name": "Books"}));

    let (status, json) = app
        .request(Method::PUT, &format!("/categories/{}", id), Some(json!({"name": "Comics"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], json!("Comics"));

    let (status, json) = app
        .request(Method::PATCH, &format!("/categories/{}", id), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], json!("Comics"));

    let (status, _) = app.request(Method::DELETE, &format!("/categories/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = app.get(&format!("/categories/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"detail": "Category not found."}));
}

#[tokio::test]
async fn test_category_validation() {
    let app = TestApp::new().await;
    app.category("Books").await;

    let (status, json) = app.post("/categories", json!({"name": "Books"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["name"], json!(["category with this name already exists."]));

    let (status, json) = app.post("/categories", json!({"name": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["name"], json!(["This field may not be blank."]));

    let (status, json) = app.post("/categories", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["name"], json!(["This field is required."]));
}

#[tokio::test]
async fn test_category_pagination() {
    let app = TestApp::new().await;
    for i in 0..12 {
        app.category(&format!("Category {:02}", i)).await;
    }

    let (status, json) = app.get("/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], json!(12));
    assert_eq!(json["next"], json!(2));
    assert_eq!(json["previous"], json!(null));
    assert_eq!(json["results"].as_array().unwrap().len(), 10);
    assert_eq!(json["results"][0]["name"], json!("Category 00"));

    let (status, json) = app.get("/categories?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["next"], json!(null));
    assert_eq!(json["previous"], json!(1));
    assert_eq!(json["results"].as_array().unwrap().len(), 2);

    let (status, json) = app.get("/categories?page=3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"detail": "Invalid page."}));
}

#[tokio::test]
async fn test_product_crud() {
    let app = TestApp::new().await;
    app.category("Electronics").await;
    app.category("Home").await;

    let (status, json) = app
        .post(
            "/products",
            json!({
                "name": "Kettle",
                "category": "Electronics",
                "sku": "KET001",
                "description": "Boils water."
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    let id = json["id"].as_i64().unwrap();
    assert_eq!(json["category"], json!("Electronics"));
    assert_eq!(json["description"], json!("Boils water."));

    let (status, json) = app
        .request(
            Method::PATCH,
            &format!("/products/{}", id),
            Some(json!({"category": "Home"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["category"], json!("Home"));
    assert_eq!(json["sku"], json!("KET001"));
    assert_eq!(json["description"], json!("Boils water."));

    let (status, json) = app
        .request(
            Method::PUT,
            &format!("/products/{}", id),
            Some(json!({"name": "Kettle XL", "category": "Home", "sku": "KET002"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["name"], json!("Kettle XL"));
    assert_eq!(json["description"], json!(null));

    let (status, json) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], json!(1));
    assert_eq!(json["results"][0]["category"], json!("Home"));

    let (status, _) = app.request(Method::DELETE, &format!("/products/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.request(Method::DELETE, &format!("/products/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_validation() {
    let app = TestApp::new().await;
    app.category("Electronics").await;
    app.product("Phone", "Electronics", "PH001").await;

    let (status, json) = app
        .post(
            "/products",
            json!({"name": "Phone 2", "category": "Garden", "sku": "PH001"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["category"], json!(["Object with name=Garden does not exist."]));
    assert_eq!(json["sku"], json!(["product with this sku already exists."]));

    let (status, json) = app.post("/products", json!({"category": "Electronics"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["name"], json!(["This field is required."]));
    assert_eq!(json["sku"], json!(["This field is required."]));
}

#[tokio::test]
async fn test_deleting_product_removes_its_prices() {
    let app = TestApp::new().await;
    app.category("Toys").await;
    let product = app.product("Robot", "Toys", "TOY001").await;
    app.price(product, 25.0, "2025-01-01", None).await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/products/{}", product), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/products/{}/prices", product)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_json_types_are_validation_errors() {
    let app = TestApp::new().await;
    let id = app.category("Books").await;

    let (status, json) = app.post("/categories", json!({"name": 5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["non_field_errors"][0]
        .as_str()
        .unwrap()
        .starts_with("JSON parse error - "));

    let (status, json) = app
        .request(Method::PATCH, &format!("/categories/{}", id), Some(json!("Comics")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("non_field_errors").is_some());

    let (status, json) = app
        .post("/products", json!({"name": "Atlas", "category": "Books", "sku": 123}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("non_field_errors").is_some());
}

#[tokio::test]
async fn test_categories_are_listed_in_creation_order() {
    let app = TestApp::new().await;
    app.category("Zeta").await;
    app.category("Alpha").await;

    let (status, json) = app.get("/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["name"], json!("Zeta"));
    assert_eq!(json["results"][1]["name"], json!("Alpha"));
}
