//! HTTP error responses
//!
//! Validation failures are reported per field (`{"field": ["message", ...]}`),
//! everything else as `{"detail": "..."}`.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use tracing::error;

use crate::services::pricing::PricingError;

/// Key for errors that concern more than one field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when no error was collected
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    Validation(FieldErrors),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(FieldErrors::single(field, message))
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found.", what))
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Bodies that are not JSON, or do not fit the request shape, fail as a whole
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => rejection.body_text(),
            _ => format!("JSON parse error - {}", rejection.body_text()),
        };
        ApiError::field(NON_FIELD_ERRORS, message)
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        error!(error = %e, "Database error");
        ApiError::Internal(format!("Database error: {}", e))
    }
}

impl From<PricingError> for ApiError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::ProductNotFound(id) => ApiError::field(
                "product",
                format!("Invalid pk \"{}\" - object does not exist.", id),
            ),
            PricingError::Timeline(violation) => ApiError::Internal(violation.to_string()),
            PricingError::Database(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(DetailResponse { detail })).into_response()
            }
            ApiError::Internal(detail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(DetailResponse { detail })).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("price", "This field is required.");
        errors.add("price", "A valid number is required.");
        errors.add("end_date", "Date has wrong format.");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "end_date": ["Date has wrong format."],
                "price": ["This field is required.", "A valid number is required."],
            })
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(5), Ok(5));
        assert!(FieldErrors::single("x", "bad").into_result(5).is_err());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::field("x", "bad").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Category").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PricingError::ProductNotFound(3)).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
