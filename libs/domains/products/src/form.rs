//! Request body for product writes: JSON or `multipart/form-data`.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, error_response};
use serde_json::Value;

use crate::image::ImageSource;
use crate::models::{Price, ProductInput, ProductPayload};

/// Product fields from either body encoding.
///
/// Multipart forms may send `categories`, `categories[]` or `categories[N]`
/// once per entry; `image` is a file part or a base64 text part. A file part
/// with no file name and no content counts as no image.
///
/// Only an unreadable body is rejected here. Well-formed bodies with mistyped
/// fields reach the service, which reports them after its existence check.
pub struct ProductForm(pub ProductInput);

impl<S> FromRequest<S> for ProductForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                error_response(StatusCode::BAD_REQUEST, "Invalid request body.", Some(e.body_text()))
            })?;
            return read_multipart(multipart).await.map(ProductForm);
        }

        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;
        Ok(ProductForm(read_json(body)))
    }
}

fn read_json(body: Value) -> ProductInput {
    match serde_json::from_value::<ProductPayload>(body) {
        Ok(payload) => payload.into(),
        Err(e) => ProductInput::malformed(format!("body: {}", e)),
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<ProductInput, Response> {
    let mut input = ProductInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from(e).into_response())?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" && field.file_name().is_some() {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::from(e).into_response())?;
            // Browsers send an empty unnamed part for an untouched file input
            if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                continue;
            }
            input.image = Some(ImageSource::Upload {
                bytes: bytes.to_vec(),
                content_type,
                file_name,
            });
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        match name.as_str() {
            "name" => input.name = text,
            "brand" => input.brand = text,
            "price" => input.set_price(Some(&Price::Text(text))),
            "image" if !text.trim().is_empty() => input.image = Some(ImageSource::DataUri(text)),
            n if n == "categories" || n.starts_with("categories[") => {
                push_categories(&mut input.categories, text)
            }
            _ => {}
        }
    }

    Ok(input)
}

/// A single part may also carry a JSON array of names
fn push_categories(categories: &mut Vec<String>, text: String) {
    if text.trim_start().starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(&text) {
            categories.extend(list);
            return;
        }
    }
    categories.push(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_price_text() {
        assert_eq!(Price::Text(" 200000 ".into()).parse(), Ok(Some(200000.0)));
        assert_eq!(Price::Text(String::new()).parse(), Ok(None));
        assert!(Price::Text("cheap".into()).parse().is_err());
        assert!(Price::Text("inf".into()).parse().is_err());
    }

    #[test]
    fn test_read_json_defers_type_errors() {
        let input = read_json(json!({ "name": "x", "price": "abc" }));
        assert_eq!(input.name, "x");
        assert_eq!(input.malformed, vec!["price: must be a number"]);

        let input = read_json(json!({ "name": ["x"], "price": 1 }));
        assert_eq!(input.malformed.len(), 1);
        assert!(input.malformed[0].starts_with("body: "));

        let input = read_json(json!({ "name": "x", "price": "45000" }));
        assert_eq!(input.price, Some(45000.0));
        assert!(input.malformed.is_empty());
    }

    #[test]
    fn test_push_categories() {
        let mut categories = Vec::new();
        push_categories(&mut categories, "Fragrance".into());
        push_categories(&mut categories, r#"["Soft", "Fresh"]"#.into());
        assert_eq!(categories, vec!["Fragrance", "Soft", "Fresh"]);
    }
}
