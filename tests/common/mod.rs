#![allow(dead_code)]

use auth_audit::core::{AppState, TokenAuthority};
use auth_audit::repositories::{MemoryAuditStore, MemoryUserStore};
use axum::http::{HeaderName, HeaderValue, header};
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Stato di test con store in memoria
pub struct TestContext {
    pub state: Arc<AppState>,
    pub users: Arc<MemoryUserStore>,
    pub audit: MemoryAuditStore,
}

pub fn create_test_context() -> TestContext {
    let users = Arc::new(MemoryUserStore::new());
    let audit = MemoryAuditStore::new();
    let state = Arc::new(AppState::with_stores(
        users.clone(),
        Arc::new(audit.clone()),
        TokenAuthority::new(TEST_SECRET),
    ));
    TestContext {
        state,
        users,
        audit,
    }
}

/// Crea un TestServer sul router dell'applicazione
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = auth_audit::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value"),
    )
}

/// Attende che lo store contenga almeno `expected` record (le scritture sono asincrone)
pub async fn wait_for_records(store: &MemoryAuditStore, expected: usize) {
    for _ in 0..100 {
        if store.len().await >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {} audit records, found {}",
        expected,
        store.len().await
    );
}

/// Lascia girare eventuali task in background prima di controllare che non ci siano record
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
