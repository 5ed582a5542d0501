use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{describe_validation_errors, error_response};
use std::convert::Infallible;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Login with an email no active user has
    #[error("No active user with email '{0}'")]
    UnknownEmail(String),

    #[error("Wrong password")]
    WrongPassword,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),

    /// A write that failed after validation; `failure` is the client-facing message
    #[error("{failure} {message}")]
    Persistence {
        failure: &'static str,
        message: String,
    },
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub(crate) fn persistence(failure: &'static str, err: UserError) -> Self {
        match err {
            e @ (UserError::NotFound(_)
            | UserError::Validation(_)
            | UserError::DuplicateEmail(_)
            | UserError::Persistence { .. }) => e,
            other => UserError::Persistence {
                failure,
                message: other.to_string(),
            },
        }
    }
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        UserError::Validation(describe_validation_errors(&errors))
    }
}

impl From<Infallible> for UserError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        match self {
            UserError::NotFound(id) => error_response(
                StatusCode::NOT_FOUND,
                "User not found.",
                Some(format!("no user with id {}", id)),
            ),
            UserError::DuplicateEmail(_) => error_response(
                StatusCode::BAD_REQUEST,
                "Validation failed.",
                Some("email: has already been taken".to_string()),
            ),
            UserError::Validation(msg) => {
                tracing::info!("User validation failed: {}", msg);
                error_response(StatusCode::BAD_REQUEST, "Validation failed.", Some(msg))
            }
            UserError::UnknownEmail(_) => {
                error_response(StatusCode::BAD_REQUEST, "User not found.", None)
            }
            UserError::WrongPassword => {
                error_response(StatusCode::BAD_REQUEST, "Wrong password.", None)
            }
            UserError::Persistence { failure, message } => {
                tracing::error!("{} {}", failure, message);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, failure, Some(message))
            }
            UserError::Database(msg) => {
                tracing::error!("User query failed: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed fetch users.",
                    Some(msg),
                )
            }
            UserError::PasswordHash(msg) | UserError::Token(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.",
                    None,
                )
            }
        }
    }
}
