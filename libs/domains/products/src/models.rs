use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::image::ImageSource;

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// System-generated, e.g. `PRD-241019-0001`; never changes after creation
    pub code: String,
    pub brand: String,
    pub categories: Vec<String>,
    pub price: f64,
    /// Public URL of the stored image
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row to insert; the service has already generated `code` and stored the image
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub code: String,
    pub brand: String,
    pub categories: Vec<String>,
    pub price: f64,
    pub image: String,
}

/// Full replacement of the editable fields; `image: None` keeps the current URL
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges {
    pub name: String,
    pub brand: String,
    pub categories: Vec<String>,
    pub price: f64,
    pub image: Option<String>,
}

/// Product fields as submitted, before title-casing and image storage.
///
/// Built from either a JSON body or a multipart form. Fields that arrived with
/// the wrong type are listed in `malformed` and reported by the service once
/// the target product is known to exist.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "is required"))]
    pub brand: String,

    #[validate(
        length(min = 1, message = "must contain at least one category"),
        custom(function = "validate_categories")
    )]
    pub categories: Vec<String>,

    #[validate(
        required(message = "is required"),
        range(min = 0.0, message = "must not be negative")
    )]
    pub price: Option<f64>,

    pub image: Option<ImageSource>,

    pub malformed: Vec<String>,
}

fn validate_categories(categories: &[String]) -> Result<(), ValidationError> {
    if categories.iter().any(|c| c.trim().is_empty()) {
        return Err(ValidationError::new("category_blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// A price sent as a JSON number or as numeric text
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    /// `Ok(None)` for blank text
    pub fn parse(&self) -> Result<Option<f64>, &'static str> {
        let price = match self {
            Price::Number(n) => *n,
            Price::Text(text) if text.trim().is_empty() => return Ok(None),
            Price::Text(text) => text.trim().parse::<f64>().map_err(|_| "must be a number")?,
        };
        if price.is_finite() {
            Ok(Some(price))
        } else {
            Err("must be a number")
        }
    }
}

/// JSON body for create/update. `image` is a base64 data URI (or bare base64).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductPayload {
    #[serde(default)]
    #[schema(example = "perfume 04")]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "The Body Shop")]
    pub brand: Option<String>,
    #[serde(default)]
    #[schema(example = json!(["Fragrance", "Soft"]))]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    #[schema(example = 200000.0)]
    pub price: Option<Price>,
    #[serde(default)]
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub image: Option<String>,
}

impl From<ProductPayload> for ProductInput {
    fn from(payload: ProductPayload) -> Self {
        let mut input = Self {
            name: payload.name.unwrap_or_default(),
            brand: payload.brand.unwrap_or_default(),
            categories: payload.categories.unwrap_or_default(),
            image: payload
                .image
                .filter(|s| !s.trim().is_empty())
                .map(ImageSource::DataUri),
            ..Default::default()
        };
        input.set_price(payload.price.as_ref());
        input
    }
}

impl ProductInput {
    /// Input whose body could not be read as a product at all
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            malformed: vec![reason.into()],
            ..Default::default()
        }
    }

    pub(crate) fn set_price(&mut self, price: Option<&Price>) {
        match price.map(Price::parse).transpose() {
            Ok(price) => self.price = price.flatten(),
            Err(reason) => self.malformed.push(format!("price: {}", reason)),
        }
    }
}

/// Query parameters for listing products
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Case-insensitive substring of name or code
    pub search: Option<String>,
    /// Maximum number of rows
    pub take: Option<u64>,
    /// Rows to skip
    pub skip: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ProductInput {
        ProductInput {
            name: "perfume 04".into(),
            brand: "Axe".into(),
            categories: vec!["Fragrance".into()],
            price: Some(30000.0),
            image: None,
            malformed: Vec::new(),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_fail() {
        let errors = ProductInput::default().validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["name", "brand", "categories", "price"] {
            assert!(fields.contains_key(field), "{field} should be reported");
        }
    }

    #[test]
    fn test_negative_price_fails() {
        let input = ProductInput {
            price: Some(-1.0),
            ..valid_input()
        };
        assert!(input.validate().unwrap_err().field_errors().contains_key("price"));
    }

    #[test]
    fn test_blank_category_fails() {
        let input = ProductInput {
            categories: vec!["Fragrance".into(), "  ".into()],
            ..valid_input()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_payload_blank_image_is_absent() {
        let input: ProductInput = ProductPayload {
            image: Some(String::new()),
            ..Default::default()
        }
        .into();
        assert!(input.image.is_none());
    }

    #[test]
    fn test_price_accepts_number_or_numeric_text() {
        let payload: ProductPayload =
            serde_json::from_str(r#"{"price": "45000"}"#).unwrap();
        let input = ProductInput::from(payload);
        assert_eq!(input.price, Some(45000.0));
        assert!(input.malformed.is_empty());

        let payload: ProductPayload = serde_json::from_str(r#"{"price": 45000.5}"#).unwrap();
        assert_eq!(ProductInput::from(payload).price, Some(45000.5));

        let payload: ProductPayload = serde_json::from_str(r#"{"price": " "}"#).unwrap();
        assert_eq!(ProductInput::from(payload).price, None);
    }

    #[test]
    fn test_unparseable_price_is_recorded_not_rejected() {
        let payload: ProductPayload =
            serde_json::from_str(r#"{"name": "x", "price": "abc"}"#).unwrap();
        let input = ProductInput::from(payload);
        assert_eq!(input.name, "x");
        assert_eq!(input.price, None);
        assert_eq!(input.malformed, vec!["price: must be a number"]);
    }
}
