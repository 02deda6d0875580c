//! Error taxonomy
//!
//! Component-level errors are typed enums; [`ApiError`] is the transport
//! boundary that turns them into HTTP responses without leaking detail.

use crate::db::StoreError;
use axum::{
    extract::rejection::FormRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const MSG_USER_EXISTS: &str = "User already exists";
pub const MSG_BAD_CREDENTIALS: &str = "Incorrect username or password";

/// Field-level input rejection, surfaced before the store is touched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Identity and login failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to issue token: {0}")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),
}

/// Registration failures
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("username already taken")]
    UsernameTaken,

    #[error(transparent)]
    Store(StoreError),

    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        match err {
            // a concurrent insert won the race for this username
            StoreError::UniqueViolation => RegistrationError::UsernameTaken,
            other => RegistrationError::Store(other),
        }
    }
}

/// Record creation / listing failures
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// HTTP-facing error
#[derive(Debug)]
pub enum ApiError {
    /// Missing, invalid or expired session; the client must log in again
    Unauthenticated,
    /// Rejected input fields
    Validation(ValidationError),
    /// Body could not be read as a form; only reported once the caller is known
    Form(FormRejection),
    /// User-correctable outcome rendered inline with a success status
    Inline(&'static str),
    /// Anything else; details stay in the logs
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "store failure");
        ApiError::Internal
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => ApiError::Unauthenticated,
            AuthError::InvalidCredentials => ApiError::Inline(MSG_BAD_CREDENTIALS),
            AuthError::Store(e) => e.into(),
            AuthError::TokenIssue(e) => {
                error!(error = %e, "token issuance failed");
                ApiError::Internal
            }
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(v) => ApiError::Validation(v),
            RegistrationError::UsernameTaken => ApiError::Inline(MSG_USER_EXISTS),
            RegistrationError::Store(e) => e.into(),
            RegistrationError::Hash(e) => {
                error!(error = %e, "password hashing failed");
                ApiError::Internal
            }
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Validation(v) => ApiError::Validation(v),
            RecordError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "detail": "Not authenticated" })),
            )
                .into_response(),
            ApiError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": err.message, "field": err.field })),
            )
                .into_response(),
            ApiError::Form(rejection) => rejection.into_response(),
            ApiError::Inline(message) => {
                (StatusCode::OK, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Internal Server Error" })),
            )
                .into_response(),
        }
    }
}
