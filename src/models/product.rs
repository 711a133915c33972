use serde::{Deserialize, Serialize};

use crate::entities::products;
use crate::error::FieldErrors;
use crate::models::validation::required_text;

pub const PRODUCT_NAME_MAX_LEN: usize = 255;
pub const SKU_MAX_LEN: usize = 100;

/// Body of product create/update requests. The category is referenced by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
}

/// Validated product fields; `None` means "leave unchanged" for partial updates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
}

impl ProductRequest {
    pub fn validate(&self, partial: bool) -> Result<ProductFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let mut text = |field: &str, value: &Option<String>, max_len: usize| match (value, partial) {
            (None, true) => None,
            (value, _) => required_text(&mut errors, field, value.as_deref(), max_len),
        };

        let fields = ProductFields {
            name: text("name", &self.name, PRODUCT_NAME_MAX_LEN),
            category: text("category", &self.category, usize::MAX),
            sku: text("sku", &self.sku, SKU_MAX_LEN),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        };

        errors.into_result(fields)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub sku: String,
    pub description: Option<String>,
}

impl ProductResponse {
    pub fn new(model: products::Model, category: String) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category,
            sku: model.sku,
            description: model.description,
        }
    }
}
