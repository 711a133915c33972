#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use pricebook_backend::{app, AppState};
use sea_orm::{Database, DatabaseConnection, DbErr};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Migrated database in a temporary directory, removed on drop
pub struct TestDb {
    pub db: DatabaseConnection,
    _dir: TempDir,
}

/// Set up a fresh SQLite database with all migrations applied
/// A file is used instead of `:memory:` so that every pooled connection sees the same data
pub async fn setup_test_db() -> Result<TestDb, DbErr> {
    let dir = tempfile::tempdir().map_err(|e| DbErr::Custom(e.to_string()))?;
    let path = dir.path().join("test.db");
    let database_url = format!("sqlite://{}?mode=rwc", path.display());

    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;

    Ok(TestDb { db, _dir: dir })
}

pub struct TestApp {
    pub router: Router,
    pub test_db: TestDb,
}

impl TestApp {
    pub async fn new() -> Self {
        let test_db = setup_test_db().await.expect("Failed to set up test DB");
        let router = app(AppState {
            db: test_db.db.clone(),
        });
        Self { router, test_db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.test_db.db
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// Create a category and return its id
    pub async fn category(&self, name: &str) -> i64 {
        let (status, json) = self
            .post("/categories", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        json["id"].as_i64().unwrap()
    }

    /// Create a product in the named category and return its id
    pub async fn product(&self, name: &str, category: &str, sku: &str) -> i64 {
        let (status, json) = self
            .post(
                "/products",
                serde_json::json!({ "name": name, "category": category, "sku": sku }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        json["id"].as_i64().unwrap()
    }

    /// POST a price interval, asserting it was accepted
    pub async fn price(&self, product: i64, price: f64, start: &str, end: Option<&str>) -> Value {
        let (status, json) = self
            .post(
                "/prices",
                serde_json::json!({
                    "product": product,
                    "price": price,
                    "start_date": start,
                    "end_date": end,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        json
    }

    /// Current timeline as `(price, start, end)` tuples ordered by start
    pub async fn timeline(&self, product: i64) -> Vec<(f64, String, Option<String>)> {
        let (status, json) = self.get(&format!("/products/{}/prices", product)).await;
        assert_eq!(status, StatusCode::OK, "{}", json);
        json.as_array()
            .unwrap()
            .iter()
            .map(|row| {
                (
                    row["price"].as_f64().unwrap(),
                    row["start_date"].as_str().unwrap().to_string(),
                    row["end_date"].as_str().map(str::to_string),
                )
            })
            .collect()
    }
}

pub fn span(price: f64, start: &str, end: Option<&str>) -> (f64, String, Option<String>) {
    (price, start.to_string(), end.map(str::to_string))
}
