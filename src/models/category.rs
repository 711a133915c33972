use serde::{Deserialize, Serialize};

use crate::entities::categories;
use crate::error::FieldErrors;
use crate::models::validation::required_text;

pub const CATEGORY_NAME_MAX_LEN: usize = 255;

/// Body of category create/update requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
}

impl CategoryRequest {
    /// Validated name; `partial` allows it to be absent (PATCH)
    pub fn validate(&self, partial: bool) -> Result<Option<String>, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = match (&self.name, partial) {
            (None, true) => None,
            (name, _) => required_text(&mut errors, "name", name.as_deref(), CATEGORY_NAME_MAX_LEN),
        };
        errors.into_result(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

impl From<categories::Model> for CategoryResponse {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_required_unless_partial() {
        let empty = CategoryRequest::default();
        assert!(empty.validate(false).unwrap_err().contains("name"));
        assert_eq!(empty.validate(true).unwrap(), None);
    }

    #[test]
    fn test_name_is_trimmed_and_bounded() {
        let request = CategoryRequest {
            name: Some("  Books ".to_string()),
        };
        assert_eq!(request.validate(false).unwrap(), Some("Books".to_string()));

        let blank = CategoryRequest {
            name: Some("   ".to_string()),
        };
        assert!(blank.validate(true).is_err());

        let long = CategoryRequest {
            name: Some("x".repeat(CATEGORY_NAME_MAX_LEN + 1)),
        };
        assert!(long.validate(false).is_err());
    }
}
