//! Account credential flow integration tests
//!
//! Tests the credential service end to end including:
//! - Registration and duplicate detection
//! - Login by email and password
//! - Account listing without credential material

mod common;

use std::sync::Arc;

use ailogistics_server::auth::Registration;
use ailogistics_server::error::AccountError;
use common::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn registration(username: &str, email: &str, password: &str, company: &str) -> Registration {
    Registration::new(username, email, password, company)
}

/// Test 1: Register, duplicate, login and wrong password through the service
#[tokio::test]
async fn test_service_account_flow() {
    let database = create_test_database().await;
    let service = create_test_service(Arc::clone(&database));

    let account = service
        .register(registration("alice", "alice@co.com", "secret123", "Acme"))
        .await
        .unwrap();
    assert_eq!(account.username, "alice");
    assert_ne!(account.password_hash, "secret123");

    let duplicate = service
        .register(registration("bob", "alice@co.com", "pw456", "Other"))
        .await;
    assert_eq!(duplicate.unwrap_err(), AccountError::DuplicateEmail);

    let summary = service
        .authenticate("alice@co.com", "secret123")
        .await
        .unwrap();
    assert_eq!(summary.username, "alice");
    assert_eq!(summary.email, "alice@co.com");
    assert_eq!(summary.company_name, "Acme");
    assert_eq!(summary.id, account.id);

    let wrong = service.authenticate("alice@co.com", "wrong").await;
    assert_eq!(wrong.unwrap_err(), AccountError::InvalidCredentials);
}

/// Test 2: Duplicate username is reported as such
#[tokio::test]
async fn test_service_duplicate_username() {
    let service = create_test_service(create_test_database().await);

    service
        .register(registration("alice", "alice@co.com", "secret123", "Acme"))
        .await
        .unwrap();
    let result = service
        .register(registration("alice", "alice2@co.com", "secret123", "Acme"))
        .await;

    assert_eq!(result.unwrap_err(), AccountError::DuplicateUsername);
    assert_eq!(service.list_accounts().await.unwrap().len(), 1);
}

/// Test 3: Concurrent registrations of one email yield exactly one account
#[tokio::test]
async fn test_concurrent_registrations() {
    let service = create_test_service(create_test_database().await);

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .register(Registration::new(
                        format!("user{}", i),
                        "shared@co.com",
                        "secret123",
                        "Acme",
                    ))
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert_eq!(e, AccountError::DuplicateEmail),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(service.list_accounts().await.unwrap().len(), 1);
}

/// Test 4: Full HTTP flow against a running server
#[tokio::test]
async fn test_http_account_flow() {
    let state = create_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/api/register", addr))
        .json(&json!({
            "username": "alice",
            "email": "alice@co.com",
            "password": "secret123",
            "companyName": "Acme"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully!");

    let response = client
        .post(format!("http://{}/api/register", addr))
        .json(&json!({
            "username": "bob",
            "email": "alice@co.com",
            "password": "pw456",
            "companyName": "Other"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Email already exists.");

    let response = client
        .post(format!("http://{}/api/login", addr))
        .json(&json!({ "email": "alice@co.com", "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Login successful!");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["companyName"], "Acme");

    let response = client
        .get(format!("http://{}/api/users", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let users: Vec<Value> = response.json().await.unwrap();
    assert_eq!(users.len(), 1);
    let text = serde_json::to_string(&users).unwrap();
    assert!(!text.contains("secret123"));
    assert!(!text.contains("$2"));
    assert!(!text.to_lowercase().contains("password"));
}

/// Test 5: Wrong password and unknown email look the same over HTTP
#[tokio::test]
async fn test_http_login_failures_match() {
    let state = create_test_state().await;
    state
        .accounts
        .register(registration("alice", "alice@co.com", "secret123", "Acme"))
        .await
        .unwrap();
    let (addr, _shutdown) = run_test_server(state).await;
    let client = reqwest::Client::new();

    let wrong_password = client
        .post(format!("http://{}/api/login", addr))
        .json(&json!({ "email": "alice@co.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    let unknown_email = client
        .post(format!("http://{}/api/login", addr))
        .json(&json!({ "email": "ghost@co.com", "password": "secret123" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_email.json().await.unwrap();
    assert_eq!(a, b);
}

/// Test 6: Missing fields are rejected before touching the store
#[tokio::test]
async fn test_http_missing_fields() {
    let state = create_test_state().await;
    let accounts = Arc::clone(&state.accounts);
    let (addr, _shutdown) = run_test_server(state).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/api/register", addr))
        .json(&json!({ "username": "alice", "email": "alice@co.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("http://{}/api/login", addr))
        .json(&json!({ "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Email and password are required.");

    assert!(accounts.list_accounts().await.unwrap().is_empty());
}

/// Test 7: Health endpoint through the full middleware stack
#[tokio::test]
async fn test_http_health() {
    let (addr, _shutdown) = run_test_server(create_test_state().await).await;

    let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}
