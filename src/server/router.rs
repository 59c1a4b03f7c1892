//! HTTP router for ailogistics-server
//!
//! This module defines the axum router that handles all HTTP requests.
//! It provides routes for:
//! - Health checks
//! - Account registration and login
//! - Account listing

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AccountService, Registration};
use crate::database::Database;
use crate::models::AccountSummary;

use super::response::{ApiError, LOGIN_FIELDS_REQUIRED, REGISTER_FIELDS_REQUIRED};

/// Shared application state
pub struct AppState<D: Database> {
    /// Credential service
    pub accounts: Arc<AccountService<D>>,

    /// Include internal error causes in registration failures
    pub expose_error_details: bool,
}

impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            expose_error_details: self.expose_error_details,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Registration request body
///
/// Every field is optional at the parsing stage so that absent fields are
/// reported with the registration message rather than a parser error.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl RegisterRequest {
    /// Convert to a registration if every field is present and non-empty
    fn into_registration(self) -> Option<Registration> {
        let username = non_empty(self.username)?;
        let email = non_empty(self.email)?;
        let password = non_empty(self.password)?;
        let company_name = non_empty(self.company_name)?;
        Some(Registration::new(username, email, password, company_name))
    }
}

/// Login request body
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AccountSummary,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Build the main application router
///
/// # Arguments
///
/// * `state` - Application state containing the credential service
///
/// # Returns
///
/// An axum Router configured with all endpoints
pub fn build_router<D: Database + 'static>(state: AppState<D>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/register", post(register_handler::<D>))
        .route("/api/login", post(login_handler::<D>))
        .route("/api/users", get(list_users_handler::<D>))
        .with_state(state)
}

/// Health check endpoint handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Registration handler
async fn register_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = payload.map(|Json(req)| req).unwrap_or_default();
    let registration = request
        .into_registration()
        .ok_or_else(|| ApiError::bad_request(REGISTER_FIELDS_REQUIRED))?;

    state
        .accounts
        .register(registration)
        .await
        .map_err(|e| ApiError::from_account_error(&e, state.expose_error_details))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "User registered successfully!" })),
    ))
}

/// Login handler
async fn login_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let request = payload.map(|Json(req)| req).unwrap_or_default();
    let (email, password) = match (non_empty(request.email), non_empty(request.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::bad_request(LOGIN_FIELDS_REQUIRED)),
    };

    let user = state
        .accounts
        .authenticate(&email, &password)
        .await
        .map_err(|e| ApiError::from_account_error(&e, false))?;

    Ok(Json(LoginResponse {
        message: "Login successful!".to_string(),
        user,
    }))
}

/// Account listing handler
async fn list_users_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
) -> impl IntoResponse {
    match state.accounts.list_accounts().await {
        Ok(accounts) => Json(accounts).into_response(),
        Err(_) => ApiError::internal().into_response(),
    }
}
