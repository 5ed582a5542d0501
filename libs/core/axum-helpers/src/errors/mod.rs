pub mod handlers;

use axum::{
    Json,
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Failure envelope shared by every endpoint.
///
/// The HTTP status always mirrors `code`.
///
/// ```json
/// { "code": 404, "message": "Product not found.", "error": "no product with id ..." }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build a failure envelope with a matching HTTP status
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    error: Option<String>,
) -> Response {
    let body = ErrorResponse {
        code: status.as_u16(),
        message: message.into(),
        error,
    };
    (status, Json(body)).into_response()
}

/// Flatten validator output into "field: message" pairs separated by "; ".
///
/// Nested list and struct errors are prefixed with their path, e.g. `categories[1]: ...`.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut parts = Vec::new();
    collect_validation_errors("", errors, &mut parts);
    parts.sort();
    parts.join("; ")
}

fn collect_validation_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let text = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(format!("{}: {}", path, text));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_validation_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

/// Errors raised outside the domain crates: extractors, auth and plumbing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error = %e, "Rejected JSON body");
                error_response(StatusCode::BAD_REQUEST, "Invalid request body.", Some(e.body_text()))
            }
            AppError::Multipart(e) => {
                tracing::warn!(error = %e, "Rejected multipart body");
                error_response(StatusCode::BAD_REQUEST, "Invalid request body.", Some(e.body_text()))
            }
            AppError::ValidationError(e) => {
                tracing::info!(error = %e, "Validation failed");
                error_response(
                    StatusCode::BAD_REQUEST,
                    "Validation failed.",
                    Some(describe_validation_errors(&e)),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                error_response(StatusCode::BAD_REQUEST, msg, None)
            }
            AppError::Unauthorized(msg) => {
                tracing::debug!("Unauthenticated: {}", msg);
                error_response(StatusCode::UNAUTHORIZED, "Unauthenticated.", Some(msg))
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                error_response(StatusCode::FORBIDDEN, "Forbidden.", Some(msg))
            }
            AppError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg, None),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.",
                    Some(msg),
                )
            }
        }
    }
}
