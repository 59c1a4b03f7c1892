//! JSON error responses
//!
//! Maps credential service errors to the status codes and messages the
//! dashboard front end expects. Every error body has the shape
//! `{"message": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::AccountError;

pub const REGISTER_FIELDS_REQUIRED: &str =
    "Username, email, password, and company name are required.";
pub const LOGIN_FIELDS_REQUIRED: &str = "Email and password are required.";
pub const DUPLICATE_USERNAME: &str = "Username already exists.";
pub const DUPLICATE_EMAIL: &str = "Email already exists.";
pub const DUPLICATE_CREDENTIAL: &str = "Username or email already exists.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const INTERNAL_ERROR: &str = "Internal server error.";
pub const REQUEST_TIMEOUT: &str = "Request timed out.";

/// Error response returned by API handlers
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 400 with the given message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 500 with the generic message
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_ERROR.to_string(),
        }
    }

    /// 408 for requests cut off by the timeout layer
    pub fn request_timeout() -> Self {
        Self {
            status: StatusCode::REQUEST_TIMEOUT,
            message: REQUEST_TIMEOUT.to_string(),
        }
    }

    /// Map a service error to a response
    ///
    /// With `expose_details`, internal failures carry their cause.
    pub fn from_account_error(error: &AccountError, expose_details: bool) -> Self {
        match error {
            AccountError::Validation(msg) => Self::bad_request(msg.clone()),
            AccountError::DuplicateUsername => Self::bad_request(DUPLICATE_USERNAME),
            AccountError::DuplicateEmail => Self::bad_request(DUPLICATE_EMAIL),
            AccountError::DuplicateCredential => Self::bad_request(DUPLICATE_CREDENTIAL),
            AccountError::InvalidCredentials => Self {
                status: StatusCode::UNAUTHORIZED,
                message: INVALID_CREDENTIALS.to_string(),
            },
            AccountError::Internal(cause) if expose_details => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Internal server error: {}", cause),
            },
            AccountError::Internal(_) => Self::internal(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "message": self.message })),
        )
            .into_response()
    }
}
