//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use ailogistics_server::auth::{AccountService, HashAlgorithm, PasswordHasher};
use ailogistics_server::config::ServerConfig;
use ailogistics_server::database::{Database, SqliteDatabase};
use ailogistics_server::server::{apply_layers, build_router, AppState};

/// Lowest bcrypt cost, keeps hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

/// Create an in-memory database for testing
pub async fn create_test_database() -> Arc<SqliteDatabase> {
    Arc::new(
        SqliteDatabase::in_memory()
            .await
            .expect("Failed to create test database"),
    )
}

/// Create a credential service backed by the given store
pub fn create_test_service<D: Database>(db: Arc<D>) -> Arc<AccountService<D>> {
    let hasher = PasswordHasher::new(HashAlgorithm::Bcrypt, TEST_BCRYPT_COST)
        .expect("Failed to create test hasher");
    Arc::new(AccountService::new(db, hasher).expect("Failed to create test service"))
}

/// Create a test application state
pub async fn create_test_state() -> AppState<SqliteDatabase> {
    let database = create_test_database().await;

    AppState {
        accounts: create_test_service(database),
        expose_error_details: false,
    }
}

/// Run a test server in the background and return the address
/// The server will be shut down when the returned shutdown sender is dropped or sent
pub async fn run_test_server(
    state: AppState<SqliteDatabase>,
) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let app = apply_layers(build_router(state), &ServerConfig::default())
        .expect("Failed to apply middleware layers");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}
