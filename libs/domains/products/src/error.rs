use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{describe_validation_errors, error_response};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Product code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    /// A write that failed after validation; `operation` is one of add/update/delete
    #[error("Failed to {operation} product: {message}")]
    Persistence {
        operation: &'static str,
        message: String,
    },
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub(crate) fn persistence(operation: &'static str, err: ProductError) -> Self {
        match err {
            e @ (ProductError::NotFound(_)
            | ProductError::Validation(_)
            | ProductError::Persistence { .. }) => e,
            other => ProductError::Persistence {
                operation,
                message: other.to_string(),
            },
        }
    }
}

impl From<ValidationErrors> for ProductError {
    fn from(errors: ValidationErrors) -> Self {
        ProductError::Validation(describe_validation_errors(&errors))
    }
}

impl From<core_storage::StorageError> for ProductError {
    fn from(err: core_storage::StorageError) -> Self {
        ProductError::Storage(err.to_string())
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        match self {
            ProductError::NotFound(id) => error_response(
                StatusCode::NOT_FOUND,
                "Product not found.",
                Some(format!("no product with id {}", id)),
            ),
            ProductError::Validation(msg) => {
                tracing::info!("Product validation failed: {}", msg);
                error_response(StatusCode::BAD_REQUEST, "Validation failed.", Some(msg))
            }
            ProductError::Persistence { operation, message } => {
                tracing::error!(operation, "Product write failed: {}", message);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed {} products.", operation),
                    Some(message),
                )
            }
            ProductError::Storage(msg) => {
                tracing::error!("Product image storage failed: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed store product image.",
                    Some(msg),
                )
            }
            ProductError::DuplicateCode(code) => {
                tracing::error!(%code, "Duplicate product code escaped the retry loop");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed add products.",
                    Some(format!("code {} already exists", code)),
                )
            }
            ProductError::Database(msg) => {
                tracing::error!("Product query failed: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed fetch products.",
                    Some(msg),
                )
            }
        }
    }
}
