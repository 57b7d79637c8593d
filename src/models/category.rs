use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{non_blank, RecordId, RecordStatus};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFields {
    #[validate(length(min = 1, message = "category name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub status: RecordStatus,
}

impl CategoryFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: RecordStatus::Active,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            status: self.status,
        }
    }
}

impl From<&Category> for CategoryFields {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            status: category.status,
        }
    }
}

/// Exact-match query parameters for `GET /categories`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategoryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let fields = CategoryFields::new("   ").normalized();
        assert!(fields.validate().is_err());
        assert!(CategoryFields::new("Laptops").validate().is_ok());
    }

    #[test]
    fn missing_status_defaults_to_active() {
        let category: Category = serde_json::from_str(r#"{"id": 1, "name": "Monitors"}"#).unwrap();
        assert_eq!(category.status, RecordStatus::Active);
        assert!(category.description.is_none());
    }
}
