use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::UserError;

/// User roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("role").with_message("must be one of ADMIN, USER".into()))
}

/// User entity - matches SQL schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Display name, title-cased on write
    pub name: String,
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the user is soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "is required"))]
    #[schema(example = "jane doe")]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "must be a valid email address"), length(max = 255))]
    #[schema(example = "jane@vascomm.co.id")]
    pub email: String,

    #[serde(default)]
    #[validate(
        length(min = 1, message = "is required"),
        must_match(other = "password_confirmation", message = "confirmation does not match")
    )]
    pub password: String,

    #[serde(default)]
    pub password_confirmation: String,

    #[serde(default)]
    #[validate(custom(function = "validate_role"))]
    #[schema(example = "USER")]
    pub role: String,
}

/// DTO for updating an existing user; the password is changed separately
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "must be a valid email address"), length(max = 255))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

/// Decode a request body whose shape is only checked once the target user exists
fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, UserError> {
    serde_json::from_value(body).map_err(|e| UserError::Validation(format!("body: {}", e)))
}

impl TryFrom<Value> for UpdateUser {
    type Error = UserError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        decode_body(body)
    }
}

impl TryFrom<Value> for ChangePassword {
    type Error = UserError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        decode_body(body)
    }
}

/// DTO for replacing a user's password
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ChangePassword {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "is required"),
        must_match(other = "password_confirmation", message = "confirmation does not match")
    )]
    pub password: String,

    #[serde(default)]
    pub password_confirmation: String,
}

/// Login credentials
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "superadmin@vascomm.co.id")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    #[schema(example = "vascomm123")]
    pub password: String,
}

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub access_token: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            token_type: "Bearer".to_string(),
            access_token,
        }
    }
}

/// Query filters for listing users
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Case-insensitive substring of name or email
    pub search: Option<String>,
    /// Maximum number of rows
    pub take: Option<u64>,
    /// Rows to skip
    pub skip: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateUser {
        CreateUser {
            name: "jane doe".into(),
            email: "jane@vascomm.co.id".into(),
            password: "secret123".into(),
            password_confirmation: "secret123".into(),
            role: "USER".into(),
        }
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "ADMIN");
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new("Jane".into(), "jane@x.io".into(), "$argon2id$...".into(), Role::User);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "USER");
        assert!(json["deleted_at"].is_null());
    }

    #[test]
    fn test_create_user_validation() {
        assert!(create_input().validate().is_ok());

        let mismatch = CreateUser {
            password_confirmation: "other".into(),
            ..create_input()
        };
        assert!(mismatch.validate().unwrap_err().field_errors().contains_key("password"));

        let bad_role = CreateUser {
            role: "ROOT".into(),
            ..create_input()
        };
        assert!(bad_role.validate().unwrap_err().field_errors().contains_key("role"));

        let bad_email = CreateUser {
            email: "not-an-email".into(),
            ..create_input()
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_token_response_is_camel_case() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".into())).unwrap();
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["accessToken"], "abc");
    }
}
